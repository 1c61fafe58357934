use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The `<format>` field of the header chunk.

```text
0 = single track file format
1 = multiple track file format, played simultaneously
2 = multiple song file format (a series of independent single-track sequences)
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}
