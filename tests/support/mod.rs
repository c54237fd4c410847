//! Test-only port allocation, adapted from the teacher's
//! `src/test_util/addr.rs`: bind an ephemeral port, register it so
//! concurrently-running tests never collide, then hand the address to the
//! caller once the listener itself has been dropped.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener as StdTcpListener};
use std::sync::{LazyLock, Mutex};

const MAX_PORT_ALLOCATION_ATTEMPTS: usize = 100;

static RESERVED_PORTS: LazyLock<Mutex<HashSet<u16>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

pub struct PortGuard {
    addr: SocketAddr,
}

impl PortGuard {
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for PortGuard {
    fn drop(&mut self) {
        RESERVED_PORTS
            .lock()
            .expect("poisoned lock potentially due to test panicking")
            .remove(&self.addr.port());
    }
}

pub fn next_addr() -> (PortGuard, SocketAddr) {
    for _ in 0..MAX_PORT_ALLOCATION_ATTEMPTS {
        let listener = StdTcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .expect("failed to bind to OS-assigned port");
        let addr = listener.local_addr().expect("failed to get local address");
        let port = addr.port();

        let mut reserved = RESERVED_PORTS
            .lock()
            .expect("poisoned lock potentially due to test panicking");
        if reserved.contains(&port) {
            continue;
        }
        reserved.insert(port);
        drop(reserved);
        drop(listener);

        return (PortGuard { addr }, addr);
    }

    panic!("failed to allocate a unique port after {MAX_PORT_ALLOCATION_ATTEMPTS} attempts");
}
