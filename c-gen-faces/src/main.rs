#![cfg(feature = "generator")]

use std::error::Error;
use std::path::PathBuf;

use c_gen_faces::generator::build_face_image;
use c_gen_faces::layout;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn main() -> Result<(), Box<dyn Error>> {
    let root = workspace_root();

    for index in 0..layout::FACE_COUNT {
        let path = root.join(layout::face_asset_path(index));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        build_face_image(index).save(&path)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
