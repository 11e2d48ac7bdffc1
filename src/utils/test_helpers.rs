use std::fmt::Display;

use assert_call::call;

use crate::{ListView, Snapshot, SnapshotChanges};

/// A list view that ignores every instruction.
pub struct NoView;

impl<S, I> ListView<S, I> for NoView {
    fn perform_batch_updates(&mut self, _changes: &SnapshotChanges<S, I>, _animating: bool) {}
    fn reload_data(&mut self, _snapshot: &Snapshot<S, I>) {}
}

/// A list view that records every instruction it receives.
pub struct RecordingView;

impl<S: Display, I: Display> ListView<S, I> for RecordingView {
    fn perform_batch_updates(&mut self, changes: &SnapshotChanges<S, I>, animating: bool) {
        call!("batch animating={animating}");
        for change in changes {
            call!("{change}");
        }
    }
    fn reload_data(&mut self, snapshot: &Snapshot<S, I>) {
        call!(
            "reload_data sections={} items={}",
            snapshot.number_of_sections(),
            snapshot.number_of_items()
        );
    }
}
