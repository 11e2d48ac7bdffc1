use diffable_snapshot::*;

#[derive(Default)]
struct Log(Vec<String>);

impl ListView<&'static str, u32> for Log {
    fn perform_batch_updates(&mut self, changes: &SnapshotChanges<&'static str, u32>, _: bool) {
        self.0.extend(changes.iter().map(|c| c.to_string()));
    }
    fn reload_data(&mut self, snapshot: &Snapshot<&'static str, u32>) {
        self.0
            .push(format!("reload {} rows", snapshot.number_of_items()));
    }
}

#[test]
fn contacts_list() {
    let mut view = Log::default();
    let mut ds = DiffableDataSource::<&'static str, u32>::new();

    let mut snapshot = ds.snapshot();
    snapshot.append_sections(["favorites", "all"]);
    snapshot.append_items([1, 2, 3], &"all");
    ds.apply_using_reload_data(snapshot, &mut view);

    let mut snapshot = ds.snapshot();
    snapshot.append_items([2], &"favorites");
    snapshot.insert_items_after([4], &3);
    snapshot.reload_items(&[1]);
    ds.apply(snapshot, &mut view, true);

    ds.delete_item(IndexPath::new(1, 0), &mut view).unwrap();

    assert_eq!(
        view.0,
        [
            "reload 3 rows",
            "insert item 4 at 1.2",
            "move item 2 from 1.1 to 0.0",
            "reload item 1 at 1.0",
            "delete item 1 at 1.0",
        ]
    );
    assert_eq!(ds.index_path(&4), Some(IndexPath::new(1, 1)));
}

#[test]
fn snapshot_survives_json() {
    let snapshot: Snapshot<String, u32> = [
        ("inbox".to_string(), vec![3, 1]),
        ("archive".to_string(), vec![]),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(json, r#"[["inbox",[3,1]],["archive",[]]]"#);

    let restored: Snapshot<String, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);
    assert!(restored.changes_from(&snapshot).is_empty());
}

#[test]
fn view_model_drives_view() {
    #[derive(Clone, PartialEq, Eq, Hash)]
    struct Group(&'static str);
    impl DiffableSection for Group {
        fn title(&self) -> &str {
            self.0
        }
    }
    struct Silent;
    impl ListView<Group, u32> for Silent {
        fn perform_batch_updates(&mut self, _: &SnapshotChanges<Group, u32>, _: bool) {}
        fn reload_data(&mut self, _: &Snapshot<Group, u32>) {}
    }

    let mut vm = ListViewModel::new([Group("todo"), Group("done")]);
    vm.add([1, 2, 3], &Group("todo"), &mut Silent);
    let changes = vm.add([2], &Group("done"), &mut Silent);

    assert_eq!(changes.len(), 1);
    assert_eq!(vm.all_items(), [1, 3, 2]);
    assert_eq!(vm.header_title(1), Some("done"));
    assert_eq!(vm.data_source().number_of_items_in_section(1), 1);
}
