//! Sample value generation for address-space seeding
//!
//! Every [`VariantType`] maps to a pair of constructors in [`GENERATORS`]: a
//! fixed scalar sample and a four-element array with pseudo-random content.
//! This is only used while the address space is built.

use chrono::{DateTime, TimeZone, Utc};
use rand::{Rng, RngCore};
use tagsim_types::{VariantArray, VariantType, VariantValue};

/// Number of elements in every generated array sample
pub const SAMPLE_ARRAY_LEN: usize = 4;

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z
const TICKS_EPOCH_SECS: i64 = -62_135_596_800;

type ScalarSample = fn() -> VariantValue;
type ArraySample = fn(&mut dyn RngCore) -> VariantArray;

/// Constructor table entry for one type tag
struct SampleGenerator {
    ty: VariantType,
    scalar: ScalarSample,
    array: ArraySample,
}

/// Sample constructors, one per supported type
static GENERATORS: [SampleGenerator; 13] = [
    SampleGenerator { ty: VariantType::Short, scalar: scalar_short, array: array_short },
    SampleGenerator { ty: VariantType::Integer, scalar: scalar_integer, array: array_integer },
    SampleGenerator { ty: VariantType::Int64, scalar: scalar_int64, array: array_int64 },
    SampleGenerator { ty: VariantType::UInt64, scalar: scalar_uint64, array: array_uint64 },
    SampleGenerator { ty: VariantType::SingleFloat, scalar: scalar_single, array: array_single },
    SampleGenerator { ty: VariantType::DoubleFloat, scalar: scalar_double, array: array_double },
    SampleGenerator { ty: VariantType::String, scalar: scalar_string, array: array_string },
    SampleGenerator { ty: VariantType::Byte, scalar: scalar_byte, array: array_byte },
    SampleGenerator { ty: VariantType::Character, scalar: scalar_character, array: array_character },
    SampleGenerator { ty: VariantType::Word, scalar: scalar_word, array: array_word },
    SampleGenerator { ty: VariantType::DoubleWord, scalar: scalar_double_word, array: array_double_word },
    SampleGenerator { ty: VariantType::Boolean, scalar: scalar_boolean, array: array_boolean },
    SampleGenerator { ty: VariantType::DateTime, scalar: scalar_datetime, array: array_datetime },
];

fn generator(ty: VariantType) -> Option<&'static SampleGenerator> {
    GENERATORS.iter().find(|g| g.ty == ty)
}

/// Generate a sample value using the thread-local RNG
pub fn generate_sample(ty: VariantType, is_array: bool) -> VariantValue {
    generate_sample_with(ty, is_array, &mut rand::thread_rng())
}

/// Generate a sample value from the given RNG
///
/// Arrays always have [`SAMPLE_ARRAY_LEN`] elements.
pub fn generate_sample_with(ty: VariantType, is_array: bool, rng: &mut dyn RngCore) -> VariantValue {
    match generator(ty) {
        Some(g) if is_array => VariantValue::Array((g.array)(rng)),
        Some(g) => (g.scalar)(),
        None => VariantValue::Null,
    }
}

/// Generate a sample value for a type given by name
///
/// Unknown type names yield [`VariantValue::Null`] instead of an error.
pub fn generate_sample_named(type_name: &str, is_array: bool) -> VariantValue {
    match type_name.parse::<VariantType>() {
        Ok(ty) => generate_sample(ty, is_array),
        Err(e) => {
            tracing::warn!(type_name, "{}, using null sample", e);
            VariantValue::Null
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar Samples
// ─────────────────────────────────────────────────────────────────────────────

fn scalar_short() -> VariantValue {
    VariantValue::I16(345)
}

fn scalar_integer() -> VariantValue {
    VariantValue::I32(20196)
}

fn scalar_int64() -> VariantValue {
    VariantValue::I64(i64::MIN)
}

fn scalar_uint64() -> VariantValue {
    VariantValue::U64(u64::MAX)
}

fn scalar_single() -> VariantValue {
    VariantValue::F32(8.123242)
}

fn scalar_double() -> VariantValue {
    VariantValue::F64(83289.48243)
}

fn scalar_string() -> VariantValue {
    VariantValue::from("-- It's a nice day --")
}

fn scalar_byte() -> VariantValue {
    VariantValue::U8(23)
}

fn scalar_character() -> VariantValue {
    VariantValue::I8(76)
}

fn scalar_word() -> VariantValue {
    VariantValue::U16(39874)
}

fn scalar_double_word() -> VariantValue {
    VariantValue::U32(4230498)
}

fn scalar_boolean() -> VariantValue {
    VariantValue::Bool(false)
}

fn scalar_datetime() -> VariantValue {
    let noon = Utc.with_ymd_and_hms(1900, 1, 1, 12, 0, 0).single().unwrap_or_default();
    VariantValue::DateTime(noon)
}

// ─────────────────────────────────────────────────────────────────────────────
// Array Samples
// ─────────────────────────────────────────────────────────────────────────────

fn fill<T>(rng: &mut dyn RngCore, mut element: impl FnMut(&mut dyn RngCore, usize) -> T) -> Vec<T> {
    (0..SAMPLE_ARRAY_LEN).map(|i| element(&mut *rng, i)).collect()
}

fn random_byte(rng: &mut dyn RngCore) -> u8 {
    rng.gen_range(0..=u8::MAX)
}

fn random_non_negative(rng: &mut dyn RngCore) -> i32 {
    rng.gen_range(0..i32::MAX)
}

fn random_unit(rng: &mut dyn RngCore) -> f64 {
    rng.gen_range(0.0..1.0)
}

fn array_short(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| i16::from(random_byte(r))).into()
}

fn array_integer(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| random_non_negative(r).wrapping_mul(100)).into()
}

fn array_int64(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| i64::from(random_non_negative(r)) * 100).into()
}

fn array_uint64(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| u64::from(random_non_negative(r).unsigned_abs()) * 100).into()
}

fn array_single(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| (random_unit(r) * 100.0) as f32).into()
}

fn array_double(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| random_unit(r) * 100.0).into()
}

fn array_string(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |_, i| format!("This is string #{i}")).into()
}

fn array_byte(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| random_byte(r)).into()
}

fn array_character(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| random_byte(r) as i8).into()
}

fn array_word(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| u16::from(random_byte(r))).into()
}

/// Values in `[0, 100)`, scaled before truncation
fn array_double_word(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| (random_unit(r) * 100.0) as u32).into()
}

fn array_boolean(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |_, i| i % 2 == 1).into()
}

/// Random instants counted in 100ns ticks from 0001-01-01
fn array_datetime(rng: &mut dyn RngCore) -> VariantArray {
    fill(rng, |r, _| {
        let ticks = i64::from(random_non_negative(r));
        let secs = TICKS_EPOCH_SECS + ticks / 10_000_000;
        let nanos = (ticks % 10_000_000) as u32 * 100;
        DateTime::from_timestamp(secs, nanos).unwrap_or_default()
    })
    .into()
}
