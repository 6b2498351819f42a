//! # Integration Flows
//!
//! Each module wires real `lnn-*` components together and swaps only the
//! OS and collaborator edges for the recording doubles from
//! `lnn-network`'s `test-utils` feature.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod capacity;
#[cfg(test)]
mod descriptor_exchange;
#[cfg(test)]
mod main_port;
#[cfg(test)]
mod monitor_flow;
