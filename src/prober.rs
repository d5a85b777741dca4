use std::mem::MaybeUninit;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::packet::EchoRequest;
use crate::stats::{HostStats, SampleRecorder};
use crate::util::resolve_host_ipv4;

/// The kernel prepends the IP header on raw sockets, so replies arrive with
/// it attached; 512 bytes is plenty for header + echo reply.
const RECV_BUF_LEN: usize = 512;

/// Every echo of a session reuses one prebuilt packet. Replies are not
/// matched by sequence number; the strictly sequential send loop keeps at
/// most one echo in flight at a time.
const ECHO_SEQUENCE: u16 = 1;

/// Probes one host: resolves it once, opens one raw ICMP socket for the
/// session, sends `echo_count` echoes sequentially and returns the
/// aggregated statistics. Resolution or socket failure is an error for this
/// host only; per-echo failures are recorded as lost packets.
pub async fn probe_host(host: String, echo_count: u32, timeout: Duration) -> Result<HostStats> {
    let ip = resolve_host_ipv4(&host)
        .await
        .with_context(|| format!("resolving {}", host))?;

    // The socket API is blocking, so the echo loop runs on the blocking
    // pool; probers for different hosts still proceed in parallel.
    tokio::task::spawn_blocking(move || run_echo_loop(&host, ip, echo_count, timeout))
        .await
        .context("prober task panicked")?
}

fn run_echo_loop(host: &str, ip: Ipv4Addr, echo_count: u32, timeout: Duration) -> Result<HostStats> {
    // Socket closes on drop, on every exit path.
    let socket = open_icmp_socket(ip).with_context(|| format!("opening ICMP socket for {}", host))?;

    let identifier = std::process::id() as u16;
    let packet = EchoRequest::new(identifier, ECHO_SEQUENCE).to_bytes();

    info!("pinging {} ({}), {} echoes", host, ip, echo_count);

    let mut recorder = SampleRecorder::new(host);
    for _ in 0..echo_count {
        let start = Instant::now();
        recorder.record_attempt();

        if let Err(e) = socket.send(&packet) {
            warn!("{}: echo send failed: {}", host, e);
            continue;
        }

        // Deadline is start + timeout, so time spent sending counts against
        // the echo. A zero read timeout means "block forever", hence the
        // 1 ms floor.
        let remaining = timeout
            .saturating_sub(start.elapsed())
            .max(Duration::from_millis(1));
        if let Err(e) = socket.set_read_timeout(Some(remaining)) {
            warn!("{}: setting read timeout failed: {}", host, e);
            continue;
        }

        let mut buf = [MaybeUninit::<u8>::uninit(); RECV_BUF_LEN];
        match socket.recv(&mut buf) {
            Ok(_) => {
                let rtt_ms = start.elapsed().as_millis() as u64;
                info!("from {} ({}): time={}ms", host, ip, rtt_ms);
                recorder.record_sample(rtt_ms);
            }
            Err(e) => {
                warn!("{}: no echo reply: {}", host, e);
            }
        }
    }

    Ok(recorder.finalize())
}

/// One raw `ip4:icmp` conversation: bound to the wildcard address and
/// connected to the target, so send/recv need no per-call addressing.
fn open_icmp_socket(ip: Ipv4Addr) -> Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)).into())?;
    socket.connect(&SocketAddr::from((ip, 0)).into())?;
    Ok(socket)
}
