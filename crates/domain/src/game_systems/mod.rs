//! Game system rule tables.
//!
//! Only Call of Cthulhu 7e (`coc7e`) is implemented.

mod coc7e;

pub use coc7e::{
    check_success, is_critical, is_fumble, is_standard_age, AgeBracket, AgeModifiers,
    Coc7eRules, DamageBonus, SuccessLevel, AGE_MAX, AGE_MIN,
};
