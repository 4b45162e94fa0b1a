use core::{cmp::Ordering, fmt};

use uuid::Uuid;

use crate::{identity::Node, layout::order, sequencer::Stamp};

/// Byte arrangement of a generated identifier.
///
/// Each variant is a pure mapping from a captured `(tick, sequence, node)`
/// tuple to 16 bytes, chosen so that the target engine's native comparison
/// sorts later stamps after earlier ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Layout {
    /// SQL Server `uniqueidentifier`.
    ///
    /// SQL Server compares the stored bytes in groups, most significant first:
    /// 10–15, 8–9, 6–7, 4–5, 0–3. The tick occupies bytes 8–15 and the
    /// byte-swapped sequence leads bytes 0–3. The node fills the rest.
    #[default]
    SqlServer,
    /// Big-endian `tick | sequence | node`, compared bytewise (Oracle
    /// `RAW(16)`).
    Binary,
    /// Same bytes as [`Layout::Binary`], consumed as lowercase hyphenated text
    /// (MySQL `CHAR(36)`, RavenDB string ids).
    String,
    /// `node | tick | sequence`: the sequential part is a suffix. Sorts
    /// bytewise among identifiers from one node.
    AtEnd,
}

impl Layout {
    /// Every layout, in declaration order.
    pub const ALL: [Self; 4] = [Self::SqlServer, Self::Binary, Self::String, Self::AtEnd];

    /// Encodes a stamp and node into an identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use seqguid::{identity::Node, layout::Layout, sequencer::Stamp};
    ///
    /// let node = Node::from_bytes([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]);
    /// let stamp = Stamp::new(0x08dc_1234_5678_9abc, 0x0102);
    ///
    /// let id = Layout::SqlServer.encode(stamp, &node);
    /// assert_eq!(id.to_string(), "4d5e0201-2b3c-001a-9abc-08dc12345678");
    /// ```
    #[inline]
    pub fn encode(self, stamp: Stamp, node: &Node) -> Uuid {
        match self {
            Self::SqlServer => encode_sql_server(stamp, node),
            Self::Binary | Self::String => {
                let mut bytes = [0u8; 16];
                bytes[..8].copy_from_slice(&stamp.tick.to_be_bytes());
                bytes[8..10].copy_from_slice(&stamp.sequence.to_be_bytes());
                bytes[10..].copy_from_slice(node.as_bytes());
                Uuid::from_bytes(bytes)
            }
            Self::AtEnd => {
                let mut bytes = [0u8; 16];
                bytes[..6].copy_from_slice(node.as_bytes());
                bytes[6..14].copy_from_slice(&stamp.tick.to_be_bytes());
                bytes[14..].copy_from_slice(&stamp.sequence.to_be_bytes());
                Uuid::from_bytes(bytes)
            }
        }
    }

    /// Encodes a stamp and node into lowercase hyphenated text.
    pub fn encode_text(self, stamp: Stamp, node: &Node) -> String {
        self.encode(stamp, node).hyphenated().to_string()
    }

    /// Recovers the stamp and node from an identifier produced by
    /// [`Layout::encode`] with the same layout.
    pub fn decode(self, id: &Uuid) -> (Stamp, Node) {
        match self {
            Self::SqlServer => decode_sql_server(id),
            Self::Binary | Self::String => {
                let b = id.as_bytes();
                let stamp = Stamp::new(
                    i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
                    u16::from_be_bytes([b[8], b[9]]),
                );
                (stamp, Node::from_bytes([b[10], b[11], b[12], b[13], b[14], b[15]]))
            }
            Self::AtEnd => {
                let b = id.as_bytes();
                let stamp = Stamp::new(
                    i64::from_be_bytes([b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13]]),
                    u16::from_be_bytes([b[14], b[15]]),
                );
                (stamp, Node::from_bytes([b[0], b[1], b[2], b[3], b[4], b[5]]))
            }
        }
    }

    /// The bytes the target engine stores for `id`.
    ///
    /// SQL Server (like every .NET `Guid`) stores the first three fields
    /// little-endian; the other layouts store the bytes as they are.
    pub fn storage_bytes(self, id: &Uuid) -> [u8; 16] {
        match self {
            Self::SqlServer => id.to_bytes_le(),
            Self::Binary | Self::String | Self::AtEnd => *id.as_bytes(),
        }
    }

    /// Compares two identifiers the way the target engine orders them.
    pub fn compare(self, a: &Uuid, b: &Uuid) -> Ordering {
        match self {
            Self::SqlServer => order::sql_server_cmp(a, b),
            Self::Binary | Self::AtEnd => a.as_bytes().cmp(b.as_bytes()),
            Self::String => order::text_cmp(a, b),
        }
    }

    /// Kebab-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqlServer => "sql-server",
            Self::Binary => "binary",
            Self::String => "string",
            Self::AtEnd => "at-end",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn encode_sql_server(stamp: Stamp, node: &Node) -> Uuid {
    let n = node.as_bytes();
    let c = u32::from_be_bytes([n[0], n[1], n[2], n[3]]);
    let d = u32::from(n[4]) << 24 | u32::from(n[5]) << 16;

    let a = stamp.tick_high();
    let b = stamp.tick_low();

    // The first field is stored little-endian, so swapping the sequence bytes
    // puts its high byte in storage byte 0.
    let sequence = u32::from(stamp.sequence.swap_bytes());

    Uuid::from_fields(
        d | sequence,
        c as u16,
        (c >> 16) as u16,
        &[
            (b >> 8) as u8,
            b as u8,
            (a >> 24) as u8,
            (a >> 16) as u8,
            (a >> 8) as u8,
            a as u8,
            (b >> 24) as u8,
            (b >> 16) as u8,
        ],
    )
}

fn decode_sql_server(id: &Uuid) -> (Stamp, Node) {
    let (d1, d2, d3, t) = id.as_fields();

    let a = u32::from_be_bytes([t[2], t[3], t[4], t[5]]);
    let b = u32::from_be_bytes([t[6], t[7], t[0], t[1]]);
    let sequence = (d1 as u16).swap_bytes();

    let [c0, c1] = d3.to_be_bytes();
    let [c2, c3] = d2.to_be_bytes();
    let [n4, n5, ..] = d1.to_be_bytes();

    (
        Stamp::from_halves(a, b, sequence),
        Node::from_bytes([c0, c1, c2, c3, n4, n5]),
    )
}
