//! Scenario tests for SizeEstimator
//!
//! Sample types mirror the shapes a managed runtime commonly lays out:
//! empty classes, padded structs, inheritance, enums and embedded structs.

use core_types::{PrimitiveKind, ScaleError, TypeId, TypeRegistry, Value};
use layout_estimator::{PlatformConfig, SizeEstimator};

struct Samples {
    registry: TypeRegistry,
    empty: TypeId,
    value_type: TypeId,
    with_value_type: TypeId,
    with_enums: TypeId,
    plain_enum: TypeId,
    non_plain_enum: TypeId,
    with_ref: TypeId,
    with_string: TypeId,
    packed: TypeId,
    inherited: TypeId,
}

fn samples() -> Samples {
    let mut registry = TypeRegistry::new();
    let byte = registry.primitive(PrimitiveKind::Byte);
    let int32 = registry.primitive(PrimitiveKind::Int32);
    let int64 = registry.primitive(PrimitiveKind::Int64);
    let string = registry.string_type();

    let empty = registry.class("Empty").finish().unwrap();
    let value_type = registry
        .structure("Pair")
        .field("l", int64)
        .field("b", byte)
        .finish()
        .unwrap();
    let with_value_type = registry
        .class("WithValueType")
        .field("i", int32)
        .field("l", int64)
        .field("value", value_type)
        .finish()
        .unwrap();
    let plain_enum = registry.enumeration("PlainEnum", PrimitiveKind::Int32).unwrap();
    let non_plain_enum = registry
        .enumeration("NonPlainEnum", PrimitiveKind::Byte)
        .unwrap();
    let with_enums = registry
        .class("WithEnums")
        .field("non_plain", non_plain_enum)
        .field("padding", int64)
        .field("plain", plain_enum)
        .finish()
        .unwrap();
    let with_ref = registry.class("WithRef").field("r", empty).finish().unwrap();
    let with_string = registry
        .class("WithString")
        .field("s", string)
        .finish()
        .unwrap();
    let packed = registry
        .class("Packed")
        .field("b", byte)
        .field("i1", int32)
        .field("i2", int32)
        .field("l1", int64)
        .field("l2", int64)
        .finish()
        .unwrap();
    let single_int = registry.class("SingleInt").field("i", int32).finish().unwrap();
    let inherited = registry
        .class("Inherited")
        .base(single_int)
        .field("l2", int64)
        .field("i3", int32)
        .finish()
        .unwrap();

    Samples {
        registry,
        empty,
        value_type,
        with_value_type,
        with_enums,
        plain_enum,
        non_plain_enum,
        with_ref,
        with_string,
        packed,
        inherited,
    }
}

fn size_x64(registry: &TypeRegistry, value: &Value<TypeId>) -> usize {
    SizeEstimator::new(registry, PlatformConfig::x64())
        .unwrap()
        .estimate_exclusive_size(value)
        .unwrap()
}

fn size_x86(registry: &TypeRegistry, value: &Value<TypeId>) -> usize {
    SizeEstimator::new(registry, PlatformConfig::x86())
        .unwrap()
        .estimate_exclusive_size(value)
        .unwrap()
}

#[cfg(test)]
mod array_tests {
    use super::*;

    #[test]
    fn test_int_array() {
        let mut registry = TypeRegistry::new();
        let ints = registry.resolve("Int32[]").unwrap();
        assert_eq!(size_x64(&registry, &Value::array(ints, 10)), 64);
        assert_eq!(size_x86(&registry, &Value::array(ints, 10)), 52);
    }

    #[test]
    fn test_long_array() {
        let mut registry = TypeRegistry::new();
        let longs = registry.resolve("Int64[]").unwrap();
        assert_eq!(size_x64(&registry, &Value::array(longs, 10)), 104);
    }

    #[test]
    fn test_structs_array() {
        let mut s = samples();
        let structs = s.registry.array_of(s.value_type).unwrap();
        assert_eq!(size_x64(&s.registry, &Value::array(structs, 10)), 184);
    }

    #[test]
    fn test_empty_array_is_clamped() {
        let mut registry = TypeRegistry::new();
        let bytes = registry.resolve("Byte[]").unwrap();
        // 4-byte length aligned to 8, plus the 16-byte header.
        assert_eq!(size_x64(&registry, &Value::array(bytes, 0)), 24);
        // 4 + 8 = 12, which is exactly the 32-bit minimum.
        assert_eq!(size_x86(&registry, &Value::array(bytes, 0)), 12);
    }

    #[test]
    fn test_reference_array_elements_are_pointers() {
        let mut s = samples();
        let packed_refs = s.registry.array_of(s.packed).unwrap();
        let strings = s.registry.resolve("String[]").unwrap();
        let nested = s.registry.resolve("Int64[][]").unwrap();
        for ty in [packed_refs, strings, nested] {
            assert_eq!(size_x64(&s.registry, &Value::array(ty, 3)), 48);
        }
    }

    #[test]
    fn test_enum_array_elements_are_aligned() {
        let mut s = samples();
        let enums = s.registry.array_of(s.plain_enum).unwrap();
        // Each 4-byte enum element is padded to 8 on 64-bit.
        assert_eq!(size_x64(&s.registry, &Value::array(enums, 10)), 104);
    }

    #[test]
    fn test_large_array_uses_large_alignment() {
        let mut registry = TypeRegistry::new();
        let ints = registry.resolve("Int32[]").unwrap();
        // 30_000 * 4 + 4 = 120_004 is past the threshold: 8-byte alignment.
        assert_eq!(size_x86(&registry, &Value::array(ints, 30_000)), 120_016);
        assert_eq!(size_x64(&registry, &Value::array(ints, 30_000)), 120_024);

        let config = PlatformConfig::x86().with_large_allocation_threshold(usize::MAX);
        let estimator = SizeEstimator::new(&registry, config).unwrap();
        assert_eq!(
            estimator
                .estimate_exclusive_size(&Value::array(ints, 30_000))
                .unwrap(),
            120_012
        );
    }

    #[test]
    fn test_array_of_native_ints_fails() {
        let mut registry = TypeRegistry::new();
        let handles = registry.resolve("IntPtr[]").unwrap();
        let estimator = SizeEstimator::new(&registry, PlatformConfig::x64()).unwrap();
        assert!(matches!(
            estimator.estimate_exclusive_size(&Value::array(handles, 4)),
            Err(ScaleError::UnsupportedPrimitiveType { .. })
        ));
    }
}

#[cfg(test)]
mod string_tests {
    use super::*;

    #[test]
    fn test_const_string() {
        let registry = TypeRegistry::new();
        let value = Value::string(registry.string_type(), "Const_str");
        assert_eq!(size_x64(&registry, &value), 40);
        assert_eq!(size_x86(&registry, &value), 32);
    }

    #[test]
    fn test_generated_string() {
        let registry = TypeRegistry::new();
        let text = format!("V:{}", 7);
        assert_eq!(size_x64(&registry, &Value::string(registry.string_type(), &text)), 28);
    }

    #[test]
    fn test_multibyte_string() {
        let registry = TypeRegistry::new();
        let value = Value::string(registry.string_type(), "𤭢𐐷");
        assert_eq!(size_x64(&registry, &value), 30);
    }

    #[test]
    fn test_empty_string_is_not_clamped() {
        let registry = TypeRegistry::new();
        let value = Value::string(registry.string_type(), "");
        assert_eq!(size_x64(&registry, &value), 22);
    }

    #[test]
    fn test_custom_char_width() {
        let registry = TypeRegistry::new();
        let mut config = PlatformConfig::x64();
        config.char_width = 1;
        let estimator = SizeEstimator::new(&registry, config).unwrap();
        let value = Value::Sequence {
            ty: registry.string_type(),
            length: 9,
        };
        assert_eq!(estimator.estimate_exclusive_size(&value).unwrap(), 9 + 4 + 1 + 16);
    }

    #[test]
    fn test_string_without_length() {
        let registry = TypeRegistry::new();
        let estimator = SizeEstimator::new(&registry, PlatformConfig::x64()).unwrap();
        assert!(matches!(
            estimator.estimate_exclusive_size(&Value::instance(registry.string_type())),
            Err(ScaleError::MissingLength { .. })
        ));
    }
}

#[cfg(test)]
mod sample_tests {
    use super::*;

    #[test]
    fn test_empty_object() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.empty)), 24);
        assert_eq!(size_x86(&s.registry, &Value::instance(s.empty)), 12);
    }

    #[test]
    fn test_value_type() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.value_type)), 16);
        assert_eq!(size_x86(&s.registry, &Value::instance(s.value_type)), 12);
    }

    #[test]
    fn test_with_value_type() {
        let s = samples();
        // 4 + 8 + 16 = 28, aligned to 32, plus header.
        assert_eq!(size_x64(&s.registry, &Value::instance(s.with_value_type)), 48);
    }

    #[test]
    fn test_with_enums() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.with_enums)), 32);
    }

    #[test]
    fn test_plain_enum() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.plain_enum)), 4);
    }

    #[test]
    fn test_non_plain_enum() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.non_plain_enum)), 1);
        assert_eq!(size_x86(&s.registry, &Value::instance(s.non_plain_enum)), 1);
    }

    #[test]
    fn test_with_ref() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.with_ref)), 24);
    }

    #[test]
    fn test_with_string() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.with_string)), 24);
        assert_eq!(size_x86(&s.registry, &Value::instance(s.with_string)), 12);
    }

    #[test]
    fn test_packed() {
        let s = samples();
        assert_eq!(size_x64(&s.registry, &Value::instance(s.packed)), 48);
    }

    #[test]
    fn test_inherited() {
        let s = samples();
        // 4 inherited + 8 + 4 = 16, plus header.
        assert_eq!(size_x64(&s.registry, &Value::instance(s.inherited)), 32);
    }
}
