use core::cmp::Ordering;

use uuid::Uuid;

/// Storage byte indexes in the order SQL Server compares them, most
/// significant first.
pub const SQL_SERVER_BYTE_ORDER: [usize; 16] = [10, 11, 12, 13, 14, 15, 8, 9, 6, 7, 4, 5, 0, 1, 2, 3];

/// Orders two identifiers as SQL Server orders `uniqueidentifier` values.
pub fn sql_server_cmp(a: &Uuid, b: &Uuid) -> Ordering {
    let a = a.to_bytes_le();
    let b = b.to_bytes_le();
    SQL_SERVER_BYTE_ORDER
        .iter()
        .map(|&i| a[i].cmp(&b[i]))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Orders two identifiers by their lowercase hyphenated text.
pub fn text_cmp(a: &Uuid, b: &Uuid) -> Ordering {
    let mut a_buf = Uuid::encode_buffer();
    let mut b_buf = Uuid::encode_buffer();
    let a = a.hyphenated().encode_lower(&mut a_buf);
    let b = b.hyphenated().encode_lower(&mut b_buf);
    (*a).cmp(&*b)
}
