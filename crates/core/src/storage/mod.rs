//! Environment-aware object storage.
//!
//! Keys, buckets and URLs for the `local`, `dev`, `stage` and `prod`
//! environments, on top of Apache OpenDAL's S3 service.
//!
//! # Layout
//!
//! ```text
//! bucket:  movomint-<env>            (none for local)
//! key:     <env>/<category>/[<subpath>/]<stem>-<8 hex><ext>
//! url:     https://<bucket>.s3.<region>.amazonaws.com/<percent-encoded key>
//! ```
//!
//! `local` computes keys but never uploads; downloads there always fail.

mod config;
mod content_type;
mod environment;
mod error;
mod key;
mod location;
mod router;
mod store;

#[cfg(test)]
mod props;

pub use config::StorageConfig;
pub use content_type::{OCTET_STREAM, content_type_for};
pub use environment::Environment;
pub use error::{StorageError, TransportError, TransportErrorKind};
pub use key::{
    DISAMBIGUATOR_LEN, Disambiguator, FixedDisambiguator, KeyBuilder, RandomDisambiguator,
    key_filename, recover_filename, split_filename,
};
pub use location::{ObjectLocation, parse_object_url, public_url};
pub use router::{DownloadedObject, LocalRouter, RemoteRouter, StorageRouter, UploadOutcome};
pub use store::{ObjectStore, OpendalStore};
