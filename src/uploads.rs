//! Staging of uploaded files on local disk.
//!
//! Files are written as `<uuid>-<original name>` into the configured directory and referred to by
//! their storage path, `uploads/<generated name>`, which is also where they're served from.

use crate::error::{
    CreateUploadDirSnafu, MultipartSnafu, RosterResult, UnexpectedFileSnafu, WriteUploadSnafu,
};
use axum::{
    body::Bytes,
    extract::{Multipart, multipart::MultipartRejection},
};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix the upload directory is served under, and the prefix of every storage path.
pub const UPLOADS_URL_PREFIX: &str = "uploads";
/// The only multipart field allowed to carry a file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

#[derive(Debug)]
pub struct Upload {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text parts in the order they arrived, plus the file if one was attached.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<Upload>,
}

impl UploadDir {
    /// Creates the directory if it doesn't exist yet.
    pub async fn create(root: impl Into<PathBuf>) -> RosterResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .context(CreateUploadDirSnafu { path: root.clone() })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload and returns its storage path.
    pub async fn store(&self, upload: Upload) -> RosterResult<String> {
        let file_name = generated_file_name(upload.original_name.as_deref(), &upload.bytes);
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .context(WriteUploadSnafu { path: path.clone() })?;

        info!(
            ?path,
            content_type = ?upload.content_type,
            len = upload.bytes.len(),
            "stored upload"
        );
        Ok(format!("{UPLOADS_URL_PREFIX}/{file_name}"))
    }

    /// Best-effort removal of something [`Self::store`] wrote.
    pub async fn discard(&self, storage_path: &str) {
        let Some(file_name) = storage_path
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            warn!(?storage_path, "not discarding a path outside the upload directory");
            return;
        };

        let path = self.root.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(?e, ?path, "unable to discard upload");
        }
    }
}

/// `<uuid>-<sanitised original name>`, or `<uuid>.<sniffed extension>` when there's no usable name.
pub fn generated_file_name(original_name: Option<&str>, bytes: &[u8]) -> String {
    let id = Uuid::new_v4();

    match original_name.map(sanitise_file_name) {
        Some(name) if !name.is_empty() => format!("{id}-{name}"),
        _ => {
            let extension = infer::get(bytes).map_or("bin", |kind| kind.extension());
            format!("{id}.{extension}")
        }
    }
}

///last path component only, anything outside `[A-Za-z0-9._-]` becomes `_`
fn sanitise_file_name(name: &str) -> String {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reads a whole multipart body, accepting at most one non-empty file in the [`FILE_FIELD`] part.
///
/// Browsers send an empty file part when nothing was picked, those count as no file. A request
/// that isn't multipart at all reads as an empty form.
pub async fn read_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> RosterResult<MultipartForm> {
    let mut form = MultipartForm::default();
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            debug!(?e, "not a multipart body, reading it as an empty form");
            return Ok(form);
        }
    };

    while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_none() {
            let value = field.text().await.context(MultipartSnafu)?;
            form.fields.push((name, value));
            continue;
        }

        let original_name = field
            .file_name()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty());
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field.bytes().await.context(MultipartSnafu)?;

        if original_name.is_none() && bytes.is_empty() {
            continue;
        }

        snafu::ensure!(
            name == FILE_FIELD && form.file.is_none(),
            UnexpectedFileSnafu { name }
        );

        form.file = Some(Upload {
            original_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_keep_the_original_name_and_never_collide() {
        let a = generated_file_name(Some("me.png"), b"");
        let b = generated_file_name(Some("me.png"), b"");

        assert_ne!(a, b);
        assert!(a.ends_with("-me.png"));
        assert!(Uuid::try_parse(&a[..36]).is_ok());
    }

    #[test]
    fn original_names_cannot_escape_the_directory() {
        let name = generated_file_name(Some("../../etc/pass wd"), b"");
        assert!(name.ends_with("-pass_wd"));
        assert!(!name.contains('/'));

        let windows = generated_file_name(Some("C:\\Users\\me\\photo.jpg"), b"");
        assert!(windows.ends_with("-photo.jpg"));
    }

    #[test]
    fn nameless_uploads_get_a_sniffed_extension() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(generated_file_name(None, &png_magic).ends_with(".png"));
        assert!(generated_file_name(Some("   "), b"???").ends_with(".bin"));
    }

    #[tokio::test]
    async fn store_then_discard_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        //storage paths use the served prefix, not the directory's own name
        let uploads = UploadDir::create(dir.path().join("nested/staged"))
            .await
            .unwrap();

        let storage_path = uploads
            .store(Upload {
                original_name: Some("cat.gif".into()),
                content_type: Some("image/gif".into()),
                bytes: Bytes::from_static(b"GIF89a"),
            })
            .await
            .unwrap();

        let file_name = storage_path.strip_prefix("uploads/").unwrap();
        let on_disk = uploads.root().join(file_name);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"GIF89a");

        uploads.discard(&storage_path).await;
        assert!(!on_disk.exists());
    }
}
