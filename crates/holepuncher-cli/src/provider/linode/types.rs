//! Linode catalog entries as printed by the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;

use holepuncher_proto::v1::{
    LinodeImage, LinodeInstance, LinodePlan, LinodeRegion, LinodeStackScript,
};

use crate::provider::timestamp::parse_timestamp_or_epoch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    pub id: i64,
    pub label: String,
    pub group: String,
    pub region: String,
    pub plan: String,
    pub image: String,
    pub status: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub hypervisor: String,
    pub disk: u64,
    pub memory: u64,
    pub vcpus: u32,
    pub transfer: u64,
}

impl From<LinodeInstance> for Instance {
    fn from(instance: LinodeInstance) -> Self {
        Self {
            status: instance.status().as_str().to_string(),
            created_at: parse_timestamp_or_epoch(&instance.created_at),
            updated_at: parse_timestamp_or_epoch(&instance.updated_at),
            id: instance.id,
            label: instance.label,
            group: instance.group,
            region: instance.region,
            plan: instance.plan,
            image: instance.image,
            ipv4: instance.ipv4,
            ipv6: instance.ipv6,
            hypervisor: instance.hypervisor,
            disk: instance.disk,
            memory: instance.memory,
            vcpus: instance.vcpus,
            transfer: instance.transfer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub price_hourly: f32,
    pub price_monthly: f32,
    pub memory: u64,
    /// Outbound network bandwidth, Mbit/s.
    pub bandwidth: u64,
    /// Monthly transfer quota, GB.
    pub transfer: u64,
    pub vcpus: u32,
}

impl From<LinodePlan> for Plan {
    fn from(plan: LinodePlan) -> Self {
        Self {
            id: plan.id,
            label: plan.label,
            class: plan.class,
            price_hourly: plan.price_hourly,
            price_monthly: plan.price_monthly,
            memory: plan.memory,
            bandwidth: plan.network_out,
            transfer: plan.transfer,
            vcpus: plan.vcpus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: String,
    pub country: String,
}

impl From<LinodeRegion> for Region {
    fn from(region: LinodeRegion) -> Self {
        Self {
            id: region.id,
            country: region.country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub id: String,
    pub label: String,
    pub size: u64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
}

impl From<LinodeImage> for Image {
    fn from(image: LinodeImage) -> Self {
        Self {
            created_at: parse_timestamp_or_epoch(&image.created_at),
            id: image.id,
            label: image.label,
            size: image.size,
            created_by: image.created_by,
            vendor: image.vendor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackScript {
    pub id: i64,
    pub label: String,
    pub description: String,
    pub body: String,
}

impl From<LinodeStackScript> for StackScript {
    fn from(script: LinodeStackScript) -> Self {
        Self {
            id: script.id,
            label: script.label,
            description: script.description,
            body: script.body,
        }
    }
}
