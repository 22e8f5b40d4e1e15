use crate::dom::ObjectAdapter;
use crate::style::library::StyleLibrary;
use crate::style::sheet::StyleSheet;
use rayon::prelude::*;

pub mod style_pass {
    use super::*;

    /// Resolves every handle into a fresh sheet, in parallel. The library is
    /// only read; do not insert rules while a pass is running.
    pub fn resolve_all<A>(library: &StyleLibrary, adapter: &A, handles: &[A::Handle]) -> Vec<StyleSheet>
    where
        A: ObjectAdapter + Sync,
        A::Handle: Send + Sync,
    {
        handles
            .par_iter()
            .map(|&handle| {
                let mut sheet = StyleSheet::new();
                library.resolve_style(adapter, handle, &mut sheet);
                sheet
            })
            .collect()
    }

    /// Resolves every object and stacks `overrides` on top: a handle present
    /// there starts from that sheet, so its valid slots win over any rule.
    pub fn resolve_with_overrides<A>(
        library: &StyleLibrary,
        adapter: &A,
        handles: &[A::Handle],
        overrides: &[(A::Handle, StyleSheet)],
    ) -> Vec<StyleSheet>
    where
        A: ObjectAdapter + Sync,
        A::Handle: Send + Sync,
    {
        handles
            .par_iter()
            .map(|&handle| {
                let mut sheet = overrides
                    .iter()
                    .find(|(target, _)| *target == handle)
                    .map(|(_, sheet)| sheet.clone())
                    .unwrap_or_default();
                library.resolve_style(adapter, handle, &mut sheet);
                sheet
            })
            .collect()
    }
}
