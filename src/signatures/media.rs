use super::Signature;

pub fn signatures() -> Vec<Signature> {
    vec![
        Signature::new("roku", "Media Player", "Roku", "Streaming Player")
            .mac_prefixes(vec!["00:0D:4B", "DC:3A:5E", "CC:6D:A0", "D8:31:CF", "B0:A7:37", "BC:D1:1F"])
            .open_ports(vec![80, 8060, 1900])
            .http_headers(vec![("Server", "Roku UPnP.*")])
            .mdns("_http._tcp", "Roku.*"),
        Signature::new("roku_tv", "Smart TV", "Roku", "TV")
            .mac_prefixes(vec!["00:0D:4B", "DC:3A:5E", "CC:6D:A0", "D8:31:CF", "B0:A7:37", "BC:D1:1F"])
            .open_ports(vec![80, 8060, 1900])
            .http_headers(vec![("Server", "Roku UPnP.*")])
            .mdns("_http._tcp", "Roku TV.*"),
        Signature::new("apple_tv", "Media Player", "Apple", "Apple TV")
            .mac_prefixes(vec!["00:25:00", "3C:07:54", "98:B8:E3", "F0:D1:A9", "F8:62:14", "FC:41:DE"])
            .open_ports(vec![7000, 3689, 5353]),
    ]
}
