//! Unit tests for Value

use core_types::{TypeRegistry, Value};

#[cfg(test)]
mod value_constructor_tests {
    use super::*;

    #[test]
    fn test_value_instance() {
        let registry = TypeRegistry::new();
        let val = Value::instance(registry.object_root());
        assert!(matches!(val, Value::Instance(ty) if ty == registry.object_root()));
        assert_eq!(val.length(), None);
    }

    #[test]
    fn test_value_array() {
        let mut registry = TypeRegistry::new();
        let ints = registry.resolve("Int32[]").unwrap();
        let val = Value::array(ints, 10);
        assert_eq!(val.runtime_type(), Some(&ints));
        assert_eq!(val.length(), Some(10));
    }

    #[test]
    fn test_value_empty_string() {
        let registry = TypeRegistry::new();
        let val = Value::string(registry.string_type(), "");
        assert_eq!(val.length(), Some(0));
    }

    #[test]
    fn test_value_ascii_string() {
        let registry = TypeRegistry::new();
        assert_eq!(Value::string(registry.string_type(), "V:3").length(), Some(3));
    }

    #[test]
    fn test_value_surrogate_pairs() {
        let registry = TypeRegistry::new();
        let val = Value::string(registry.string_type(), "𤭢𐐷");
        assert_eq!(val.length(), Some(4));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::array(1u8, 3), Value::Sequence { ty: 1u8, length: 3 });
        assert_ne!(Value::instance(1u8), Value::Null);
    }
}
