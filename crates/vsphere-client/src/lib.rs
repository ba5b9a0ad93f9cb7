//! vSphere management backend client
//!
//! A Rust client for the vCenter Automation REST API, scoped to what the
//! guest network reconciler needs: VM lookup, ethernet adapter inventory,
//! network and distributed portgroup listing, and device-change submission
//! reported as a task outcome.
//!
//! # Example
//!
//! ```no_run
//! use vsphere_client::{VsphereClient, VsphereClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VsphereClient::new(
//!     "https://vcenter.example.com".to_string(),
//!     "administrator@vsphere.local".to_string(),
//!     "secret".to_string(),
//!     false,
//! )?;
//! client.create_session().await?;
//!
//! let vm = client.find_vm(Some("test-vm"), None, None).await?;
//! if let Some(vm) = vm {
//!     let adapters = client.list_ethernet_adapters(&vm.id).await?;
//!     println!("{} has {} adapters", vm.name, adapters.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod vsphere_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::VsphereClient;
pub use common::HttpClient;
pub use error::VsphereError;
pub use models::*;
pub use vsphere_trait::VsphereClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockVsphereClient;
