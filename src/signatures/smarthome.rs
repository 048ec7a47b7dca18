use super::Signature;

pub fn signatures() -> Vec<Signature> {
    vec![
        Signature::new("shelly_plug", "Smart Plug", "Shelly", "Plug")
            .mac_prefixes(vec!["C4:5B:BE", "CC:50:E3", "E8:DB:84", "08:B6:1F", "C8:2B:96"])
            .open_ports(vec![80, 443])
            .http_headers(vec![("Server", "Mongoose/.*"), ("Content-Type", "application/json")])
            .mdns("_http._tcp", "shelly.*"),
        Signature::new("shelly_25", "Smart Relay", "Shelly", "2.5")
            .mac_prefixes(vec!["C4:5B:BE", "CC:50:E3", "E8:DB:84", "08:B6:1F", "C8:2B:96", "BC:FF:4D"])
            .open_ports(vec![80, 443])
            .http_headers(vec![("Server", "Mongoose/.*"), ("Content-Type", "application/json")])
            .mdns("_http._tcp", "shelly.*"),
        Signature::new("philips_hue_bridge", "Smart Hub", "Philips", "Hue Bridge")
            .open_ports(vec![80, 443])
            .http_headers(vec![("Server", "nginx")]),
    ]
}
