use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// The five dominant skillset tags a chart can be classified under.
/// Declaration order is significant: ties in a score's skill vector are
/// broken in favor of the earliest declared variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Skillset {
    Stream = 0,
    Jumpstream = 1,
    Handstream = 2,
    Chordjacks = 3,
    Technical = 4
}

impl TryFrom<usize> for Skillset {
    type Error = ();

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Skillset::Stream),
            1 => Ok(Skillset::Jumpstream),
            2 => Ok(Skillset::Handstream),
            3 => Ok(Skillset::Chordjacks),
            4 => Ok(Skillset::Technical),
            _ => Err(())
        }
    }
}
