use fond_dashboard::dashboard::layout::{reconcile_hidden, reconcile_order, LayoutState};
use fond_dashboard::dashboard::persistence::LocalLayoutStore;
use fond_dashboard::dashboard::registry::{WidgetDescriptor, WidgetRegistry};
use std::collections::HashSet;
use tempfile::tempdir;

fn three_widgets() -> WidgetRegistry {
    WidgetRegistry::new(vec![
        WidgetDescriptor::new("stats", "Statistics"),
        WidgetDescriptor::new("news", "Latest news"),
        WidgetDescriptor::new("achievements", "Recent achievements"),
    ])
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Every ordered selection (with repeats allowed up to length 4) of registry
/// ids plus two unknown ids.
fn candidates() -> Vec<Vec<String>> {
    let pool = ["stats", "news", "achievements", "ghost", "legacy"];
    let mut out = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..4 {
        let mut next = Vec::new();
        for base in &frontier {
            for id in pool {
                let mut c: Vec<String> = base.clone();
                c.push(id.to_string());
                next.push(c);
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

#[test]
fn restore_example_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard-settings.json");
    std::fs::write(
        &path,
        r#"{"order": ["news", "ghost", "stats"], "hidden": ["ghost", "news"]}"#,
    )
    .unwrap();

    let registry = three_widgets();
    let mut state = LocalLayoutStore::new(&path).load(&registry);
    assert_eq!(state.order, ids(&["news", "stats", "achievements"]));
    assert_eq!(state.hidden_ids(), ids(&["news"]));

    state.toggle_hidden("achievements");
    assert_eq!(state.hidden_ids(), ids(&["news", "achievements"]));
}

#[test]
fn reconciled_order_is_complete_and_keeps_relative_order() {
    let registry = three_widgets();
    let expected: HashSet<String> = registry.default_order().into_iter().collect();
    for candidate in candidates() {
        let (order, _) = reconcile_order(&candidate, &registry);
        assert_eq!(order.len(), registry.len(), "candidate {candidate:?}");
        let set: HashSet<String> = order.iter().cloned().collect();
        assert_eq!(set, expected, "candidate {candidate:?}");

        // Known ids keep the order of their first appearance.
        let mut seen = HashSet::new();
        let known: Vec<String> = candidate
            .iter()
            .filter(|id| registry.contains(id) && seen.insert(id.to_string()))
            .cloned()
            .collect();
        assert_eq!(&order[..known.len()], &known[..], "candidate {candidate:?}");

        // The rest follows registry order.
        let tail: Vec<String> = registry
            .default_order()
            .into_iter()
            .filter(|id| !known.contains(id))
            .collect();
        assert_eq!(&order[known.len()..], &tail[..], "candidate {candidate:?}");
    }
}

#[test]
fn hidden_is_always_a_subset_of_order() {
    let registry = three_widgets();
    for order in candidates() {
        for hidden in candidates().iter().step_by(37) {
            let (state, _) = LayoutState::from_candidate(&order, hidden, &registry);
            for id in state.hidden.iter() {
                assert!(state.order.contains(id), "{id} hidden but not ordered");
            }
        }
    }
}

#[test]
fn reconciliation_is_idempotent() {
    let registry = three_widgets();
    for candidate in candidates() {
        let (order, _) = reconcile_order(&candidate, &registry);
        let (hidden, _) = reconcile_hidden(&candidate, &order);
        let hidden: Vec<String> = hidden.iter().cloned().collect();

        let (again, warnings) = reconcile_order(&order, &registry);
        assert!(warnings.is_empty());
        assert_eq!(again, order);
        let (hidden_again, warnings) = reconcile_hidden(&hidden, &again);
        assert!(warnings.is_empty());
        assert_eq!(hidden_again.iter().cloned().collect::<Vec<_>>(), hidden);
    }
}

#[test]
fn corrupted_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard-settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    let registry = WidgetRegistry::with_defaults();
    let state = LocalLayoutStore::new(&path).load(&registry);
    assert_eq!(state.order, registry.default_order());
    assert!(state.hidden.is_empty());
}

#[test]
fn stale_widget_removed_in_later_release_is_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard-settings.json");
    std::fs::write(
        &path,
        r#"{"order": ["kudos", "weather", "stats"], "hidden": ["weather"]}"#,
    )
    .unwrap();
    let registry = WidgetRegistry::with_defaults();
    let state = LocalLayoutStore::new(&path).load(&registry);
    assert_eq!(state.order.len(), registry.len());
    assert_eq!(&state.order[..2], &ids(&["kudos", "stats"])[..]);
    assert!(state.hidden.is_empty());
}

#[test]
fn saved_record_excludes_session_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard-settings.json");
    let registry = three_widgets();
    let mut state = LayoutState::new(&registry);
    state.edit_mode = true;
    state.toggle_hidden("news");
    LocalLayoutStore::new(&path).save(&state).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({ "order": ["stats", "news", "achievements"], "hidden": ["news"] })
    );

    let restored = LocalLayoutStore::new(&path).load(&registry);
    assert!(!restored.edit_mode);
    assert_eq!(restored.hidden_ids(), ids(&["news"]));
}
