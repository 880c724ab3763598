//! # rrfm
//!
//! Client library for the HTTP file management interface of machines
//! running RepRapFirmware, covering the SD card operations the firmware
//! exposes:
//!
//! - Connect, list directories (with pagination handled transparently and
//!   optional recursion into subdirectories), and inspect files.
//! - Upload with CRC32 transfer verification, download, create
//!   directories, move/rename (optionally overwriting), and delete
//!   (optionally recursive).
//!
//! The firmware emits timestamps without a timezone; this library
//! interprets them in the local timezone of the process and formats
//! request timestamps the same way.
//!
//! Every operation is a plain request/response round trip executed
//! strictly sequentially — no internal parallelism, retries, or
//! timeouts. Impose deadlines by wrapping calls, e.g. with
//! `tokio::time::timeout`.
//!
//! ## Example
//!
//! ```no_run
//! use rrfm::FileManager;
//!
//! # async fn example() -> rrfm::Result<()> {
//! let fm = FileManager::new("printer.local", 80);
//! fm.connect("secret").await?;
//!
//! let listing = fm.filelist("/gcodes", true).await?;
//! for entry in &listing.files {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//!
//! if listing.contains("/gcodes/benchy.gcode") {
//!     let file = fm.download("/gcodes/benchy.gcode").await?;
//!     println!("downloaded {} bytes in {:?}", file.body.len(), file.elapsed);
//! }
//!
//! fm.upload("/gcodes/new.gcode", b"G28\n".to_vec()).await?;
//! # Ok(())
//! # }
//! ```

mod checksum;
pub mod client;
pub mod error;
pub mod filelist;
pub mod transport;
pub mod types;

pub use client::FileManager;
pub use error::{Result, RfmError};
pub use filelist::Filelist;
pub use transport::{HttpTransport, Response, Transport};
pub use types::{Entry, EntryKind, FileInfo, TIME_FORMAT};
