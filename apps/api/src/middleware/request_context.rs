use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderMap, header};
use ipnet::IpNet;

/// Caller details recorded alongside authorization decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// `X-Forwarded-For` is only read when the socket peer is a trusted proxy.
    pub fn from_request(request: &Request, trusted_proxies: &[IpNet]) -> Self {
        let headers = request.headers();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| address.ip());

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Self {
            ip_address: client_ip(headers, peer, trusted_proxies).map(|ip| ip.to_string()),
            user_agent,
        }
    }
}

fn is_trusted(address: &IpAddr, trusted_proxies: &[IpNet]) -> bool {
    trusted_proxies.iter().any(|net| net.contains(address))
}

/// Walks the forwarding chain from the nearest hop and stops at the first
/// address no trusted proxy accounts for.
fn client_ip(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> Option<IpAddr> {
    let peer = peer?;
    if !is_trusted(&peer, trusted_proxies) {
        return Some(peer);
    }

    let Some(forwarded_for) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    else {
        return Some(peer);
    };

    let mut client = peer;
    for hop in forwarded_for.rsplit(',').map(str::trim) {
        let Ok(address) = hop.parse::<IpAddr>() else {
            break;
        };
        client = address;
        if !is_trusted(&address, trusted_proxies) {
            break;
        }
    }

    Some(client)
}
