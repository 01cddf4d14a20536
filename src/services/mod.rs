//! EC2 service implementations, one per API area:
//! - AMIs: create, register, describe, deregister, launch permissions
//! - Instances: run, describe, stop/start/reboot/terminate, user data
//! - Elastic Block Store: volumes, attachments, snapshots
//! - Security groups, key pairs and elastic IPs

mod amis;
mod ebs;
mod elastic_ips;
mod instances;
mod key_pairs;
mod security_groups;

pub use amis::AmiService;
pub use ebs::{ElasticBlockStoreService, MAX_VOLUME_SIZE_GIB};
pub use elastic_ips::ElasticIpService;
pub use instances::InstanceService;
pub use key_pairs::KeyPairService;
pub use security_groups::SecurityGroupService;

pub(crate) use crate::client::RequestExecutor;
