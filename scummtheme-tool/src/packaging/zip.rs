use anyhow::{Context, Result};
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, StringEncoding, ZipDateTime, ZipEntryBuilder, ZipString};
use chrono::{DateTime, Datelike, Local};
use scummtheme_lib::Compressor;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Represents a file to include in the ZIP archive.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Raw name bytes; names that are not UTF-8 are stored unchanged.
    pub name_in_archive: Vec<u8>,
}

impl FileEntry {
    fn display_name(&self) -> String {
        String::from_utf8_lossy(&self.name_in_archive).into_owned()
    }

    fn zip_name(&self) -> ZipString {
        match String::from_utf8(self.name_in_archive.clone()) {
            Ok(name) => name.into(),
            Err(e) => ZipString::new(e.into_bytes(), StringEncoding::Raw),
        }
    }
}

fn compression_for(compressor: Compressor) -> Compression {
    match compressor {
        Compressor::Deflate => Compression::Deflate,
        Compressor::Stored => Compression::Stored,
    }
}

/// Zip timestamps are local wall-clock time and cannot go below 1980.
fn zip_date_time(modified: SystemTime) -> Option<ZipDateTime> {
    let local: DateTime<Local> = modified.into();
    if local.year() < 1980 {
        return None;
    }
    Some(ZipDateTime::from_chrono(&local.naive_local().and_utc()))
}

async fn append_file(
    writer: &mut ZipFileWriter<File>,
    fe: &FileEntry,
    compression: Compression,
) -> Result<()> {
    let data = tokio::fs::read(&fe.path)
        .await
        .with_context(|| format!("reading {}", fe.path.display()))?;
    let meta = tokio::fs::metadata(&fe.path)
        .await
        .with_context(|| format!("reading metadata of {}", fe.path.display()))?;

    let mut builder = ZipEntryBuilder::new(fe.zip_name(), compression);
    if let Some(date) = meta.modified().ok().and_then(zip_date_time) {
        builder = builder.last_modification_date(date);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder = builder.unix_permissions(meta.permissions().mode() as u16);
    }

    writer
        .write_entry_whole(builder, &data)
        .await
        .with_context(|| format!("adding {} to archive", fe.display_name()))?;
    debug!(entry = %fe.display_name(), bytes = data.len(), "entry written");
    Ok(())
}

/// Writes the central directory and flushes the file to disk.
async fn finish(writer: ZipFileWriter<File>, out: &Path) -> Result<()> {
    let mut file = writer
        .close()
        .await
        .with_context(|| format!("finalizing {}", out.display()))?
        .into_inner();
    file.flush()
        .await
        .with_context(|| format!("flushing {}", out.display()))?;
    Ok(())
}

/// Creates (or truncates) `out` and stores every entry in order.
///
/// `on_added` runs after each entry is written. When an entry fails the
/// archive is still finalized with what was written so far, and the entry's
/// error is returned.
pub async fn write_zip_async<F>(
    out: &Path,
    compressor: Compressor,
    files: &[FileEntry],
    mut on_added: F,
) -> Result<()>
where
    F: FnMut(&FileEntry),
{
    let file = File::create(out)
        .await
        .with_context(|| format!("creating archive {}", out.display()))?;
    let mut writer = ZipFileWriter::with_tokio(file);
    let compression = compression_for(compressor);

    let mut written = Ok(());
    for fe in files {
        if let Err(e) = append_file(&mut writer, fe, compression).await {
            written = Err(e);
            break;
        }
        on_added(fe);
    }

    let finished = finish(writer, out).await;
    written.and(finished)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;
    use tokio::runtime::Builder;

    /// One entry read back from an archive on disk.
    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct ArchivedEntry {
        pub name: Vec<u8>,
        pub data: Vec<u8>,
        /// (year, month, day, hour, minute, second) as stored.
        pub modified: (i32, u32, u32, u32, u32, u32),
        pub permissions: Option<u16>,
    }

    impl ArchivedEntry {
        pub fn name(&self) -> String {
            String::from_utf8_lossy(&self.name).into_owned()
        }
    }

    /// Entries of the archive at `path`, sorted by name.
    pub fn read_archive(path: &Path) -> Vec<ArchivedEntry> {
        let data = std::fs::read(path).unwrap();
        let rt = Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let reader = async_zip::base::read::mem::ZipFileReader::new(data)
                .await
                .unwrap();
            let mut out = Vec::new();
            for index in 0..reader.file().entries().len() {
                let stored = &reader.file().entries()[index];
                let date = stored.last_modification_date();
                let modified = (
                    date.year(),
                    date.month(),
                    date.day(),
                    date.hour(),
                    date.minute(),
                    date.second(),
                );
                let name = stored.filename().as_bytes().to_vec();
                let permissions = stored.unix_permissions();

                let mut entry = reader.reader_with_entry(index).await.unwrap();
                let mut buf = Vec::new();
                entry.read_to_end_checked(&mut buf).await.unwrap();
                out.push(ArchivedEntry {
                    name,
                    data: buf,
                    modified,
                    permissions,
                });
            }
            out.sort();
            out
        })
    }
}
