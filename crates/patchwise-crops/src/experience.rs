//! Cumulative experience table for skill levels 1 through 99.
//!
//! The table is fixed: entry `n - 1` is the total experience needed to
//! reach level `n`. Level 1 starts at zero.

use crate::yield_model::{MAX_SKILL_LEVEL, MIN_SKILL_LEVEL};

/// Cumulative experience at the start of each level, indexed by
/// `level - 1`.
pub const EXPERIENCE_TABLE: [u32; 99] = [
    0, 83, 174, 276, 388, 512, 650, 801, 969, 1_154, // 1-10
    1_358, 1_584, 1_833, 2_107, 2_411, 2_746, 3_115, 3_523, 3_973, 4_470, // 11-20
    5_018, 5_624, 6_291, 7_028, 7_842, 8_740, 9_730, 10_824, 12_031, 13_363, // 21-30
    14_833, 16_456, 18_247, 20_224, 22_406, 24_815, 27_473, 30_408, 33_648, 37_224, // 31-40
    41_171, 45_529, 50_339, 55_649, 61_512, 67_983, 75_127, 83_014, 91_721, 101_333, // 41-50
    111_945, 123_660, 136_594, 150_872, 166_636, 184_040, 203_254, 224_466, 247_886,
    273_742, // 51-60
    302_288, 333_804, 368_599, 407_015, 449_428, 496_254, 547_953, 605_032, 668_051,
    737_627, // 61-70
    814_445, 899_257, 992_895, 1_096_278, 1_210_421, 1_336_443, 1_475_581, 1_629_200,
    1_798_808, 1_986_068, // 71-80
    2_192_818, 2_421_087, 2_673_114, 2_951_373, 3_258_594, 3_597_792, 3_972_294, 4_385_776,
    4_842_295, 5_346_332, // 81-90
    5_902_831, 6_517_253, 7_195_629, 7_944_614, 8_771_558, 9_684_577, 10_692_629, 11_805_606,
    13_034_431, // 91-99
];

/// Total experience needed to reach `level`.
///
/// Returns `None` for levels outside `[1, 99]`.
pub fn experience_for_level(level: u32) -> Option<u32> {
    if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&level) {
        return None;
    }
    let index = usize::try_from(level.checked_sub(1)?).ok()?;
    EXPERIENCE_TABLE.get(index).copied()
}

/// Experience needed to go from `start` to `target`.
///
/// Returns `None` if either level is out of range or `target < start`.
pub fn experience_between(start: u32, target: u32) -> Option<u32> {
    experience_for_level(target)?.checked_sub(experience_for_level(start)?)
}

/// The level a given amount of total experience corresponds to.
pub fn level_for_experience(experience: u32) -> u32 {
    let reached = EXPERIENCE_TABLE
        .iter()
        .take_while(|threshold| **threshold <= experience)
        .count();
    u32::try_from(reached).unwrap_or(MAX_SKILL_LEVEL)
}
