use super::*;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;
use std::fmt::Display;

#[test]
fn same_type_same_key() {
    assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
    assert_ne!(TypeKey::of::<String>(), TypeKey::of::<u32>());
}

#[test]
fn trait_object_key_differs_from_implementor() {
    assert_ne!(TypeKey::of::<dyn Display>(), TypeKey::of::<String>());
    assert!(TypeKey::of::<dyn Display>().is::<dyn Display>());
    assert!(!TypeKey::of::<dyn Display>().is::<String>());
}

#[test]
fn hashing_follows_type_id() {
    let mut keys = FxHashSet::default();
    keys.insert(TypeKey::of::<String>());
    keys.insert(TypeKey::of::<String>());
    keys.insert(TypeKey::of::<u32>());
    assert_eq!(keys.len(), 2);
}

#[test]
fn display_uses_type_name() {
    let key = TypeKey::of::<u32>();
    assert_eq!(key.to_string(), "u32");
    assert_eq!(format!("{key:?}"), "TypeKey(u32)");
    assert_eq!(key.name(), std::any::type_name::<u32>());
    assert_eq!(key.id(), TypeId::of::<u32>());
}
