use assert_call::{call, CallRecorder};
use parse_display::Display;

use super::*;
use crate::utils::test_helpers::{NoView, RecordingView};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
enum Section {
    #[display("main")]
    Main,
    #[display("more")]
    More,
    #[display("hidden")]
    Hidden,
}

impl DiffableSection for Section {
    fn title(&self) -> &str {
        match self {
            Section::Main => "Main",
            Section::More => "More",
            Section::Hidden => "Hidden",
        }
    }
    fn footer(&self) -> Option<String> {
        match self {
            Section::More => Some("end of list".to_string()),
            _ => None,
        }
    }
}

#[derive(Default)]
struct TextCell {
    text: String,
}
impl Provide<&'static str> for TextCell {
    fn provide(&mut self, item: &&'static str) {
        self.text = item.to_string();
    }
}

fn view_model() -> ListViewModel<Section, &'static str> {
    ListViewModel::new([Section::Main, Section::More, Section::Main])
}

#[test]
fn catalog_is_deduplicated() {
    let vm = view_model();
    assert_eq!(vm.sections(), [Section::Main, Section::More]);
    assert!(vm.items(&Section::Main).is_empty());
    assert!(vm.items(&Section::Hidden).is_empty());
}

#[test]
fn add_and_remove_push_diffs() {
    let mut cr = CallRecorder::new();
    let mut vm = view_model();

    vm.add(["a", "b"], &Section::Main, &mut RecordingView);
    cr.verify([
        "batch animating=true",
        "insert section main at 0",
        "insert section more at 1",
    ]);
    assert_eq!(vm.items(&Section::Main), ["a", "b"]);

    vm.add(["c"], &Section::More, &mut RecordingView);
    cr.verify(["batch animating=true", "insert item c at 1.0"]);

    vm.add(["a"], &Section::More, &mut RecordingView);
    cr.verify(["batch animating=true", "move item a from 0.0 to 1.1"]);
    assert_eq!(vm.items(&Section::Main), ["b"]);
    assert_eq!(vm.items(&Section::More), ["c", "a"]);

    vm.remove([&"b", &"zzz"], &Section::Main, &mut RecordingView);
    cr.verify(["batch animating=true", "delete item b at 0.0"]);
    assert_eq!(vm.all_items(), ["c", "a"]);
}

#[test]
fn sections_outside_catalog_are_ignored() {
    let mut cr = CallRecorder::new();
    let mut vm = view_model();
    let changes = vm.add(["x"], &Section::Hidden, &mut RecordingView);
    assert!(changes.is_empty());
    let changes = vm.remove([&"x"], &Section::Hidden, &mut RecordingView);
    assert!(changes.is_empty());
    cr.verify(());
    assert!(vm.all_items().is_empty());
}

#[test]
fn removing_nothing_sends_nothing() {
    let mut cr = CallRecorder::new();
    let mut vm = view_model();
    vm.add(["a"], &Section::Main, &mut RecordingView);
    cr.verify([
        "batch animating=true",
        "insert section main at 0",
        "insert section more at 1",
    ]);
    let changes = vm.remove([&"q"], &Section::Main, &mut RecordingView);
    assert!(changes.is_empty());
    cr.verify(());
}

#[test]
fn configure_cell_provides_item() {
    let mut vm = view_model();
    vm.add(["a", "b"], &Section::Main, &mut NoView);

    let mut cell = TextCell::default();
    assert!(vm.configure_cell(IndexPath::new(0, 1), &mut cell));
    assert_eq!(cell.text, "b");
    assert!(!vm.configure_cell(IndexPath::new(1, 0), &mut cell));
    assert_eq!(cell.text, "b");
}

#[test]
fn header_and_footer_titles() {
    let mut vm = view_model();
    assert_eq!(vm.header_title(0), None);

    vm.add(["a"], &Section::More, &mut NoView);
    assert_eq!(vm.header_title(0), Some("Main"));
    assert_eq!(vm.header_title(1), Some("More"));
    assert_eq!(vm.header_title(2), None);
    assert_eq!(vm.footer_title(0), None);
    assert_eq!(vm.footer_title(1).as_deref(), Some("end of list"));
}

#[test]
fn select_reports_item() {
    let mut cr = CallRecorder::new();
    let mut vm = view_model();
    vm.add(["a", "b"], &Section::Main, &mut RecordingView);
    cr.verify([
        "batch animating=true",
        "insert section main at 0",
        "insert section more at 1",
    ]);

    assert!(vm.select(IndexPath::new(0, 0)));
    vm.on_select(|item| call!("selected {item}"));
    assert!(vm.select(IndexPath::new(0, 1)));
    assert!(!vm.select(IndexPath::new(0, 2)));
    cr.verify("selected b");
}

#[test]
fn user_edits_keep_items_in_sync() {
    let mut cr = CallRecorder::new();
    let mut vm = view_model();
    vm.add(["a", "b"], &Section::Main, &mut NoView);
    vm.add(["c"], &Section::More, &mut NoView);

    vm.move_item(IndexPath::new(0, 0), IndexPath::new(1, 0), &mut RecordingView)
        .unwrap();
    cr.verify(["batch animating=false", "move item a from 0.0 to 1.0"]);
    assert_eq!(vm.items(&Section::Main), ["b"]);
    assert_eq!(vm.items(&Section::More), ["a", "c"]);

    vm.delete_item(IndexPath::new(1, 1), &mut RecordingView).unwrap();
    cr.verify(["batch animating=true", "delete item c at 1.1"]);
    assert_eq!(vm.items(&Section::More), ["a"]);

    let err = vm
        .delete_item(IndexPath::new(1, 1), &mut RecordingView)
        .unwrap_err();
    assert_eq!(err, InvalidIndexPath(IndexPath::new(1, 1)));
    cr.verify(());

    // later adds start from the edited lists
    vm.add(["d"], &Section::Main, &mut RecordingView);
    cr.verify(["batch animating=true", "insert item d at 0.1"]);
    assert_eq!(vm.all_items(), ["b", "d", "a"]);
}
