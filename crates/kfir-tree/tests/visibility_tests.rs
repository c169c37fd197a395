//! Tests for the visibility lattice and effective visibility.

use kfir_common::LanguageVersionSettings;
use kfir_tree::{EffectiveVisibility, GraphBuilder, Modality, Visibility, class_ids};
use std::cmp::Ordering;

#[test]
fn test_visibility_partial_order_pairs() {
    use Visibility::*;
    let expected = [
        (Public, Protected, Some(Ordering::Greater)),
        (Public, Internal, Some(Ordering::Greater)),
        (Public, Private, Some(Ordering::Greater)),
        (Protected, Internal, None),
        (Internal, Protected, None),
        (Protected, Private, Some(Ordering::Greater)),
        (Internal, Private, Some(Ordering::Greater)),
        (Private, PrivateToThis, Some(Ordering::Greater)),
        (Private, Public, Some(Ordering::Less)),
        (Local, Public, None),
        (Local, Private, None),
    ];
    for (a, b, ordering) in expected {
        assert_eq!(a.partial_cmp(&b), ordering, "{a} vs {b}");
    }
}

#[test]
fn test_partial_order_is_reflexive_and_antisymmetric() {
    for a in Visibility::ALL {
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
        for b in Visibility::ALL {
            let forward = a.partial_cmp(&b);
            let backward = b.partial_cmp(&a);
            assert_eq!(forward, backward.map(Ordering::reverse), "{a} vs {b}");
        }
    }
}

#[test]
fn test_lower_bound_of_protected_and_internal() {
    assert_eq!(
        EffectiveVisibility::Protected.lower_bound(EffectiveVisibility::Internal),
        EffectiveVisibility::InternalProtected
    );
    assert_eq!(
        EffectiveVisibility::Public.lower_bound(EffectiveVisibility::PrivateInFile),
        EffectiveVisibility::PrivateInFile
    );
    assert!(EffectiveVisibility::ProtectedBound.public_api());
    assert!(!EffectiveVisibility::Internal.public_api());
    assert!(EffectiveVisibility::Local.private_api());
}

#[test]
fn test_effective_visibility_follows_containers() {
    let mut b = GraphBuilder::new();
    let file = b.file("vis.kt");
    let unit = b.unit_type();
    let hidden = b
        .class(file, "Hidden")
        .visibility(Visibility::Internal)
        .modality(Modality::Open)
        .id();
    let member = b.function(hidden, "member", unit).id();
    let guarded = b
        .function(hidden, "guarded", unit)
        .visibility(Visibility::Protected)
        .id();
    let secret = b
        .function(hidden, "secret", unit)
        .visibility(Visibility::Private)
        .id();
    let top_private = b
        .function(file, "helper", unit)
        .visibility(Visibility::Private)
        .id();
    let open = b.class(file, "Open").modality(Modality::Open).id();
    let protected_in_public = b
        .function(open, "hook", unit)
        .visibility(Visibility::Protected)
        .id();
    let outer = b.function(file, "outer", unit).id();
    let local = b.class(outer, "Local").id();
    let local_member = b.function(local, "run", unit).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert_eq!(s.effective_visibility(member), EffectiveVisibility::Internal);
    assert_eq!(
        s.effective_visibility(guarded),
        EffectiveVisibility::InternalProtected
    );
    assert_eq!(s.effective_visibility(secret), EffectiveVisibility::PrivateInClass);
    assert_eq!(s.effective_visibility(top_private), EffectiveVisibility::PrivateInFile);
    assert_eq!(
        s.effective_visibility(protected_in_public),
        EffectiveVisibility::Protected
    );
    assert_eq!(s.effective_visibility(local), EffectiveVisibility::Local);
    assert_eq!(s.effective_visibility(local_member), EffectiveVisibility::Local);
    assert_eq!(s.effective_visibility(outer), EffectiveVisibility::Public);
}

#[test]
fn test_published_api_counts_as_public() {
    let mut b = GraphBuilder::new();
    let file = b.file("published.kt");
    let unit = b.unit_type();
    let published = b.annotation(class_ids::PUBLISHED_API);
    let api = b
        .function(file, "api", unit)
        .visibility(Visibility::Internal)
        .annotation(published)
        .id();
    let plain = b
        .function(file, "plain", unit)
        .visibility(Visibility::Internal)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert_eq!(
        s.published_api_effective_visibility(api),
        Some(EffectiveVisibility::Public)
    );
    assert_eq!(s.published_api_effective_visibility(plain), None);
}
