use super::Signature;

/// Generic network-gear family; covers the Aruba line, whose AP and switch
/// signatures share the same OUI range and overlapping open-port set and so
/// are disambiguated mostly by `http_header_patterns`/`snmp_oid_patterns`.
pub fn signatures() -> Vec<Signature> {
    let prefixes = vec!["00:0B:86", "00:1A:1E", "04:BD:88", "24:DE:C6", "94:B4:0F", "D8:C7:C8", "AC:A3:1E"];

    vec![
        Signature::new("aruba_ap", "Access Point", "Aruba", "Access Point")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443])
            .http_headers(vec![("Server", "Aruba.*"), ("WWW-Authenticate", ".*Aruba.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Aruba.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.14823.*"),
            ])
            .mdns("_airwave-discovery._tcp", "Aruba.*"),
        Signature::new("aruba_switch", "Switch", "Aruba", "Switch")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 23, 80, 443, 161, 162])
            .http_headers(vec![("Server", "Aruba.*"), ("WWW-Authenticate", ".*Aruba.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Aruba.*Switch.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.14823.*"),
            ])
            .mdns("_http._tcp", "Aruba.*"),
        Signature::new("aruba_instant_on", "Access Point", "Aruba", "Instant On")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![80, 443, 8080, 8082])
            .http_headers(vec![("Server", "Aruba.*Instant.*On.*"), ("WWW-Authenticate", ".*Aruba.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Aruba.*Instant.*On.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.14823.*"),
            ])
            .mdns("_http._tcp", ".*Instant.*On.*"),
    ]
}
