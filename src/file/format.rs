use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
How the tracks of a file relate to each other.

| Value | Meaning |
|---|---|
| 0 | one track holding every channel |
| 1 | several tracks played together; the first carries the tempo map |
| 2 | several independent single-track patterns |
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    #[default]
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}
