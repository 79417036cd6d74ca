// Typed views of what the notifier reads (invocation inputs, automation API
// payloads, the property group) and what it produces (the aggregate record
// and the output mapping).

pub mod api;
mod event;
mod inputs;
mod property_group;
mod record;

pub use self::{
    event::{status, EventKind, EventTopic, EventType},
    inputs::{EventMetadata, InvocationInputs},
    property_group::{keys as property_keys, value_to_text, PropertyGroup},
    record::{AggregateRecord, DiskEntry, MachineDetails, Outputs, ResourceEntry},
};
