use domain::{NumericId, ViewerIdentity};
use owner_view_access::{AccessDecision, decide_access, evaluate_access};
use owner_view_config::{AccessSettings, AnonymousBehavior};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn settings(groups: &[i64], staff_override: bool) -> AccessSettings {
    AccessSettings {
        allowed_group_ids: groups.iter().copied().collect(),
        anonymous_behavior: AnonymousBehavior::Deny,
        staff_override_enabled: staff_override,
    }
}

fn member_of(groups: &[i64]) -> ViewerIdentity {
    ViewerIdentity::new(1, false, groups.iter().copied().map(NumericId::from).collect())
}

#[test]
fn empty_group_list_is_unrestricted() {
    let settings = settings(&[], false);
    assert_eq!(decide_access(None, &settings), AccessDecision::Unrestricted);
    assert!(evaluate_access(None, &settings));
    assert!(evaluate_access(Some(&member_of(&[])), &settings));
}

#[test]
fn anonymous_denied_when_groups_configured() {
    let mut settings = settings(&[3], true);
    assert_eq!(decide_access(None, &settings), AccessDecision::AnonymousDenied);

    settings.anonymous_behavior = AnonymousBehavior::Allow;
    assert!(!evaluate_access(None, &settings));
}

#[test]
fn staff_override_requires_setting() {
    let staff = ViewerIdentity::new(2, true, Vec::new());
    assert_eq!(
        decide_access(Some(&staff), &settings(&[3], true)),
        AccessDecision::StaffOverride
    );
    assert_eq!(
        decide_access(Some(&staff), &settings(&[3], false)),
        AccessDecision::NoGroupMatch
    );
}

#[test]
fn group_membership_matches_after_normalization() {
    let viewer = ViewerIdentity::new(
        4,
        false,
        vec![NumericId::from("5"), NumericId::from("not-a-number")],
    );
    assert_eq!(
        decide_access(Some(&viewer), &settings(&[5], false)),
        AccessDecision::GroupMatch
    );
    assert!(!evaluate_access(Some(&viewer), &settings(&[6], false)));
}

#[test]
fn malformed_viewer_degrades_to_no_membership() {
    let viewer: ViewerIdentity =
        serde_json::from_str(r#"{ "staff": null, "groups": null }"#).expect("viewer");
    assert!(!evaluate_access(Some(&viewer), &settings(&[1], true)));
}

proptest! {
    #[test]
    fn unrestricted_for_any_viewer(groups in prop::collection::vec(any::<i64>(), 0..6), staff in any::<bool>()) {
        let viewer = ViewerIdentity::new(1, staff, groups.into_iter().map(NumericId::from).collect());
        prop_assert!(evaluate_access(Some(&viewer), &settings(&[], false)));
    }

    #[test]
    fn anonymous_never_satisfies_restriction(allowed in prop::collection::btree_set(any::<i64>(), 1..6)) {
        let settings = AccessSettings {
            allowed_group_ids: allowed,
            anonymous_behavior: AnonymousBehavior::Deny,
            staff_override_enabled: true,
        };
        prop_assert!(!evaluate_access(None, &settings));
    }

    #[test]
    fn privileged_viewer_with_override_always_allowed(
        allowed in prop::collection::btree_set(0i64..50, 0..6),
        groups in prop::collection::vec(0i64..50, 0..6),
    ) {
        let viewer = ViewerIdentity::new(1, true, groups.into_iter().map(NumericId::from).collect());
        let settings = AccessSettings {
            allowed_group_ids: allowed,
            anonymous_behavior: AnonymousBehavior::Deny,
            staff_override_enabled: true,
        };
        prop_assert!(evaluate_access(Some(&viewer), &settings));
    }

    #[test]
    fn allowed_iff_groups_intersect(
        allowed in prop::collection::btree_set(0i64..20, 1..6),
        groups in prop::collection::vec(0i64..20, 0..6),
        as_text in any::<bool>(),
    ) {
        let memberships = groups
            .iter()
            .map(|id| if as_text { NumericId::from(id.to_string().as_str()) } else { NumericId::from(*id) })
            .collect();
        let viewer = ViewerIdentity::new(1, false, memberships);
        let settings = AccessSettings {
            allowed_group_ids: allowed.clone(),
            anonymous_behavior: AnonymousBehavior::Deny,
            staff_override_enabled: false,
        };
        let member: BTreeSet<i64> = groups.into_iter().collect();
        let expected = !member.is_disjoint(&allowed);
        prop_assert_eq!(evaluate_access(Some(&viewer), &settings), expected);
    }
}
