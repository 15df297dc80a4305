pub const FACE_PIXEL_SIZE: u32 = 256;
pub const FACE_COUNT: usize = 12;
pub const FACES_DIR: &str = "assets/faces";

pub fn face_file_name(index: usize) -> String {
    format!("face_{:02}.png", index % FACE_COUNT)
}

/// Path of the face asset for card `index`, relative to the workspace root.
/// Indices past `FACE_COUNT` wrap around, so any hand size can be dealt from
/// the fixed set of generated faces.
pub fn face_asset_path(index: usize) -> String {
    format!("{FACES_DIR}/{}", face_file_name(index))
}
