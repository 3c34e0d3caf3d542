use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use axum::body::Bytes;
use image::ImageFormat;
use uuid::Uuid;

/// Sub-directory of the media root that post images are written to.
pub const UPLOAD_DIR: &str = "posts";
/// URL prefix the media root is served under.
pub const URL_PREFIX: &str = "/media";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("image decoding task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}

/// A file received in a multipart form.
#[derive(Debug)]
pub struct Upload {
	pub file_name: Option<String>,
	pub bytes: Bytes,
}

/// Stores uploaded images on the local filesystem.
#[derive(Clone)]
pub struct MediaStore {
	root: Arc<PathBuf>,
}

impl MediaStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: Arc::new(root.into()),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Saves an uploaded image, returning its path relative to the media root.
	///
	/// Returns `Ok(None)` when the upload does not decode as a supported raster
	/// format; the caller keeps going without an image.
	pub async fn save_image(&self, upload: Upload) -> Result<Option<String>, Error> {
		let bytes = upload.bytes.clone();
		let format = tokio::task::spawn_blocking(move || detect_image(&bytes)).await?;

		let Some(format) = format else {
			tracing::warn!(
				file_name = upload.file_name.as_deref().unwrap_or("-"),
				size = upload.bytes.len(),
				"discarding upload that is not an image"
			);

			return Ok(None);
		};

		let extension = format.extensions_str().first().copied().unwrap_or("img");
		let name = format!("{UPLOAD_DIR}/{}.{extension}", Uuid::new_v4());

		tokio::fs::create_dir_all(self.root.join(UPLOAD_DIR)).await?;
		tokio::fs::write(self.root.join(&name), &upload.bytes).await?;

		tracing::debug!(path = %name, "stored image");

		Ok(Some(name))
	}

	/// Deletes a stored file. A file that is already gone is not an error.
	pub async fn remove(&self, name: &str) -> Result<(), Error> {
		match tokio::fs::remove_file(self.root.join(name)).await {
			Ok(()) => {
				tracing::debug!(path = %name, "removed image");
				Ok(())
			}
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(error) => Err(error.into()),
		}
	}
}

/// Public URL of a stored media file.
pub fn url(name: &str) -> String {
	format!("{URL_PREFIX}/{name}")
}

/// Returns the format of `bytes` if they fully decode as an image.
pub fn detect_image(bytes: &[u8]) -> Option<ImageFormat> {
	let format = image::guess_format(bytes).ok()?;

	image::load_from_memory_with_format(bytes, format).ok()?;
	Some(format)
}
