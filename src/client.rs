use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::checksum;
use crate::error::{Result, RfmError};
use crate::filelist::Filelist;
use crate::transport::{HttpTransport, Response, Transport};
use crate::types::{now_string, Entry, FileInfo};

const CONNECT_ENDPOINT: &str = "rr_connect";
const FILELIST_ENDPOINT: &str = "rr_filelist";
const FILEINFO_ENDPOINT: &str = "rr_fileinfo";
const MKDIR_ENDPOINT: &str = "rr_mkdir";
const UPLOAD_ENDPOINT: &str = "rr_upload";
const MOVE_ENDPOINT: &str = "rr_move";
const DOWNLOAD_ENDPOINT: &str = "rr_download";
const DELETE_ENDPOINT: &str = "rr_delete";

const ERR_DRIVE_NOT_MOUNTED: u64 = 1;
const ERR_DIRECTORY_NOT_EXIST: u64 = 2;

/// Error envelope carried by every JSON response; 0 means no error
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    err: u64,
}

/// One page of an `rr_filelist` response
#[derive(Deserialize)]
struct FilelistPage {
    #[serde(default)]
    dir: String,
    #[serde(default)]
    files: Vec<Entry>,
    /// Offset to request the next page at, 0 when this was the last page
    #[serde(default)]
    next: u64,
}

/// Client for the SD card contents of a machine running RepRapFirmware,
/// speaking its HTTP interface.
///
/// All operations are plain request/response round trips; the firmware
/// keeps no session state beyond [`connect`](FileManager::connect).
/// Recursive listing and recursive deletion run strictly sequentially,
/// one directory at a time, and abort on the first failure. No call has
/// an internal timeout; wrap the returned future in a deadline if you
/// need one.
pub struct FileManager {
    transport: Arc<dyn Transport>,
}

impl FileManager {
    /// Create a client for `http://{host}:{port}`
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_base_url(format!("http://{}:{}", host, port))
    }

    /// Create a client for an arbitrary base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new(base_url)),
        }
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Establish a connection to the firmware.
    ///
    /// Only transport success is checked; the firmware does not report a
    /// decodable error for bad credentials here.
    pub async fn connect(&self, password: &str) -> Result<()> {
        let query = [("password", password.to_string()), ("time", now_string())];
        self.transport.get(CONNECT_ENDPOINT, &query).await?;
        Ok(())
    }

    /// Fetch the listing of `dir`, draining all pages. With `recursive`
    /// set, every subdirectory is fetched as well and attached to
    /// [`Filelist::subdirs`] in entry order.
    pub async fn filelist(&self, dir: &str, recursive: bool) -> Result<Filelist> {
        if recursive {
            self.filelist_recursive(dir.to_string()).await
        } else {
            self.fetch_directory(dir).await
        }
    }

    fn filelist_recursive(
        &self,
        dir: String,
    ) -> Pin<Box<dyn Future<Output = Result<Filelist>> + Send + '_>> {
        Box::pin(async move {
            let mut fl = self.fetch_directory(&dir).await?;

            // Directories sort first, so the scan can stop at the first file
            let subdir_paths: Vec<String> = fl
                .files
                .iter()
                .take_while(|entry| entry.is_dir())
                .map(|entry| format!("{}/{}", fl.dir, entry.name))
                .collect();

            for path in subdir_paths {
                let sub = self.filelist_recursive(path).await?;
                fl.subdirs.push(sub);
            }
            Ok(fl)
        })
    }

    /// Drain all pages of one directory and assemble the sorted listing
    async fn fetch_directory(&self, dir: &str) -> Result<Filelist> {
        let mut entries = Vec::new();
        let mut listed_dir: Option<String> = None;
        let mut first = 0;

        loop {
            let page = self.fetch_page(dir, first).await?;
            let FilelistPage {
                dir: page_dir,
                files,
                next,
            } = page;
            if listed_dir.is_none() {
                listed_dir = Some(page_dir);
            }
            entries.extend(files);
            if next == 0 {
                break;
            }
            first = next;
        }

        Ok(Filelist::assemble(
            listed_dir.unwrap_or_else(|| dir.to_string()),
            entries,
        ))
    }

    async fn fetch_page(&self, dir: &str, first: u64) -> Result<FilelistPage> {
        let query = [("dir", dir.to_string()), ("first", first.to_string())];
        let response = self.transport.get(FILELIST_ENDPOINT, &query).await?;

        let envelope: ErrorEnvelope = serde_json::from_slice(&response.body)?;
        match envelope.err {
            0 => {}
            ERR_DRIVE_NOT_MOUNTED => return Err(RfmError::DriveNotMounted),
            ERR_DIRECTORY_NOT_EXIST => {
                return Err(RfmError::DirectoryNotFound {
                    path: dir.to_string(),
                })
            }
            _ => {
                return Err(RfmError::OperationFailed {
                    action: format!("List directory {}", dir),
                })
            }
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Fetch metadata for a single file
    pub async fn fileinfo(&self, path: &str) -> Result<FileInfo> {
        let query = [("name", path.to_string())];
        let response = self.transport.get(FILEINFO_ENDPOINT, &query).await?;

        let envelope: ErrorEnvelope = serde_json::from_slice(&response.body)?;
        if envelope.err != 0 {
            return Err(RfmError::FileNotFound {
                path: path.to_string(),
            });
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Download a file, returning its raw bytes and the request duration
    pub async fn download(&self, path: &str) -> Result<Response> {
        let query = [("name", path.to_string())];
        self.transport.get(DOWNLOAD_ENDPOINT, &query).await
    }

    /// Create a new directory
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        let query = [("dir", path.to_string())];
        let response = self.transport.get(MKDIR_ENDPOINT, &query).await?;
        check_error(format!("Mkdir {}", path), &response.body)
    }

    /// Rename or move a file or directory within the same SD card
    pub async fn mv(&self, old: &str, new: &str) -> Result<()> {
        let query = [("old", old.to_string()), ("new", new.to_string())];
        let response = self.transport.get(MOVE_ENDPOINT, &query).await?;
        check_error(format!("Rename {} to {}", old, new), &response.body)
    }

    /// Move like [`mv`](FileManager::mv), deleting the target first if it
    /// exists
    pub async fn mv_overwrite(&self, old: &str, new: &str) -> Result<()> {
        match self.fileinfo(new).await {
            Ok(_) => self.delete(new).await?,
            Err(RfmError::FileNotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        self.mv(old, new).await
    }

    /// Delete a file or an empty directory
    pub async fn delete(&self, path: &str) -> Result<()> {
        let query = [("name", path.to_string())];
        let response = self.transport.get(DELETE_ENDPOINT, &query).await?;
        check_error(format!("Delete {}", path), &response.body)
    }

    /// Delete a directory with all of its contents.
    ///
    /// Fetches the full tree first, then deletes depth-first in listing
    /// order. The first failed deletion aborts the whole operation.
    pub async fn delete_recursive(&self, path: &str) -> Result<()> {
        let fl = self.filelist(path, true).await?;
        self.delete_tree(&fl).await?;
        self.delete(path).await
    }

    fn delete_tree<'a>(
        &'a self,
        fl: &'a Filelist,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            // Contents go before their directory; the firmware refuses to
            // remove non-empty directories.
            for sub in &fl.subdirs {
                self.delete_tree(sub).await?;
                self.delete(&sub.dir).await?;
            }
            for entry in fl.files.iter().filter(|entry| entry.is_file()) {
                self.delete(&format!("{}/{}", fl.dir, entry.name)).await?;
            }
            Ok(())
        })
    }

    /// Upload a file, returning the request duration.
    ///
    /// A CRC32 checksum of the payload travels along as a query parameter
    /// so the firmware can verify transfer integrity; the payload itself
    /// is sent byte-identical to what was checksummed.
    pub async fn upload(&self, path: &str, content: impl Into<Bytes>) -> Result<Duration> {
        let payload = content.into();
        let query = [
            ("name", path.to_string()),
            ("time", now_string()),
            ("crc32", checksum::crc32_hex(&payload)),
        ];
        let response = self.transport.post(UPLOAD_ENDPOINT, &query, payload).await?;
        check_error(format!("Uploading file to {}", path), &response.body)?;
        Ok(response.elapsed)
    }

    /// Upload from a reader. The content is fully buffered up front for
    /// checksum computation; a read failure aborts before any network
    /// call is made.
    pub async fn upload_reader<R>(&self, path: &str, reader: &mut R) -> Result<Duration>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload).await?;
        self.upload(path, payload).await
    }
}

fn check_error(action: String, body: &[u8]) -> Result<()> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body)?;
    if envelope.err != 0 {
        return Err(RfmError::OperationFailed { action });
    }
    Ok(())
}
