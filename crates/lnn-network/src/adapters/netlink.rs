//! # Netlink Route Monitor
//!
//! Linux `NETLINK_ROUTE` socket subscribed to link and IPv4/IPv6 address
//! groups. Message decoding is pure and tested without a socket.

use crate::monitor::{MonitorError, NotificationKind, NotificationSource, RawNotification};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use tracing::{debug, trace};

const RECV_BUF_LEN: usize = 8192;

const NLMSG_HDR_LEN: usize = 16;
const IFINFOMSG_LEN: usize = 16;
const IFADDRMSG_LEN: usize = 8;
const RTATTR_HDR_LEN: usize = 4;

const NLMSG_ERROR: u16 = 2;
const NLMSG_DONE: u16 = 3;

const fn nlmsg_align(len: usize) -> usize {
    (len + 3) & !3
}

/// Kernel route-notification source.
pub struct NetlinkMonitor {
    fd: Option<OwnedFd>,
    buf: Vec<u8>,
}

impl Default for NetlinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NetlinkMonitor {
    /// Create an unopened monitor.
    pub fn new() -> Self {
        Self {
            fd: None,
            buf: vec![0u8; RECV_BUF_LEN],
        }
    }
}

impl NotificationSource for NetlinkMonitor {
    fn name(&self) -> &str {
        "netlink"
    }

    fn open(&mut self) -> Result<(), MonitorError> {
        self.fd = None;

        // SAFETY: plain socket(2); the descriptor is owned immediately.
        let raw = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                libc::NETLINK_ROUTE,
            )
        };
        if raw < 0 {
            return Err(MonitorError::Io(io::Error::last_os_error().to_string()));
        }
        // SAFETY: `raw` is a fresh descriptor nobody else owns.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        // SAFETY: sockaddr_nl is plain data; zero is a valid bit pattern.
        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        addr.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        addr.nl_groups =
            (libc::RTMGRP_LINK | libc::RTMGRP_IPV4_IFADDR | libc::RTMGRP_IPV6_IFADDR) as u32;

        // SAFETY: `addr` outlives the call and the length matches its type.
        let rc = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &addr as *const libc::sockaddr_nl as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(MonitorError::Io(io::Error::last_os_error().to_string()));
        }

        debug!("Netlink route socket bound");
        self.fd = Some(fd);
        Ok(())
    }

    fn next_batch(&mut self) -> Result<Vec<RawNotification>, MonitorError> {
        let Some(fd) = self.fd.as_ref() else {
            return Err(MonitorError::Io("netlink socket not open".to_string()));
        };

        loop {
            // SAFETY: the buffer is valid for `len` bytes for the whole call.
            let n = unsafe {
                libc::recv(
                    fd.as_raw_fd(),
                    self.buf.as_mut_ptr() as *mut libc::c_void,
                    self.buf.len(),
                    0,
                )
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(MonitorError::Io(err.to_string()));
            }
            if n == 0 {
                return Err(MonitorError::Io("netlink socket returned EOF".to_string()));
            }
            return Ok(parse_messages(&self.buf[..n as usize]));
        }
    }
}

fn read_u16(buf: &[u8], at: usize) -> Option<u16> {
    buf.get(at..at + 2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
}

fn read_u32(buf: &[u8], at: usize) -> Option<u32> {
    buf.get(at..at + 4)
        .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
}

/// Find a NUL-terminated string attribute of type `wanted`.
fn string_attr(attrs: &[u8], wanted: u16) -> Option<String> {
    let mut offset = 0;
    while offset + RTATTR_HDR_LEN <= attrs.len() {
        let len = read_u16(attrs, offset)? as usize;
        let kind = read_u16(attrs, offset + 2)?;
        if len < RTATTR_HDR_LEN || offset + len > attrs.len() {
            return None;
        }
        if kind == wanted {
            let value = &attrs[offset + RTATTR_HDR_LEN..offset + len];
            let end = value.iter().position(|b| *b == 0).unwrap_or(value.len());
            return std::str::from_utf8(&value[..end]).ok().map(str::to_string);
        }
        offset += nlmsg_align(len);
    }
    None
}

/// Decode every link/address notification in one datagram.
///
/// Truncated or unrelated messages are skipped.
pub fn parse_messages(buf: &[u8]) -> Vec<RawNotification> {
    let mut out = Vec::new();
    let mut offset = 0;

    while offset + NLMSG_HDR_LEN <= buf.len() {
        let (Some(len), Some(kind)) = (read_u32(buf, offset), read_u16(buf, offset + 4)) else {
            break;
        };
        let len = len as usize;
        if len < NLMSG_HDR_LEN || offset + len > buf.len() {
            break;
        }
        if kind == NLMSG_DONE || kind == NLMSG_ERROR {
            break;
        }

        let body = &buf[offset + NLMSG_HDR_LEN..offset + len];
        if let Some(notification) = parse_message(kind, body) {
            out.push(notification);
        } else {
            trace!(kind, "Netlink message skipped");
        }
        offset += nlmsg_align(len);
    }
    out
}

fn parse_message(kind: u16, body: &[u8]) -> Option<RawNotification> {
    match kind {
        libc::RTM_NEWADDR | libc::RTM_DELADDR => {
            if body.len() < IFADDRMSG_LEN {
                return None;
            }
            let if_index = read_u32(body, 4)?;
            // IPv4 alias labels ("eth0:1") name the parent interface.
            let if_name = string_attr(&body[IFADDRMSG_LEN..], libc::IFA_LABEL)
                .map(|label| label.split(':').next().unwrap_or_default().to_string());
            let kind = if kind == libc::RTM_NEWADDR {
                NotificationKind::AddressAdded
            } else {
                NotificationKind::AddressRemoved
            };
            Some(RawNotification {
                kind,
                if_index,
                if_name,
            })
        }
        libc::RTM_NEWLINK | libc::RTM_DELLINK => {
            if body.len() < IFINFOMSG_LEN {
                return None;
            }
            let if_index = read_u32(body, 4)?;
            let flags = read_u32(body, 8)?;
            let if_name = string_attr(&body[IFINFOMSG_LEN..], libc::IFLA_IFNAME);
            let up = kind == libc::RTM_NEWLINK && flags & libc::IFF_UP as u32 != 0;
            Some(RawNotification {
                kind: if up {
                    NotificationKind::LinkUp
                } else {
                    NotificationKind::LinkDown
                },
                if_index,
                if_name,
            })
        }
        _ => None,
    }
}
