use super::Signature;

pub fn signatures() -> Vec<Signature> {
    let prefixes = vec!["00:14:6C", "20:E5:2A", "28:80:88", "84:1B:5E", "C4:3D:C7", "9C:3D:CF"];

    vec![
        Signature::new("netgear_managed_switch", "Switch", "Netgear", "Smart Managed Pro Switch")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 23, 80, 443, 161])
            .http_headers(vec![("Server", "Netgear.*"), ("WWW-Authenticate", ".*NETGEAR.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*NETGEAR.*Switch.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.4526.*"),
            ]),
        Signature::new("netgear_nighthawk", "Router", "Netgear", "Nighthawk")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![80, 443, 5000])
            .http_headers(vec![("Server", "Netgear.*"), ("WWW-Authenticate", ".*NETGEAR.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*NETGEAR.*Nighthawk.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.4526.*"),
            ])
            .mdns("_http._tcp", "NETGEAR.*"),
        Signature::new("netgear_orbi", "Router", "Netgear", "Orbi")
            .mac_prefixes(vec!["00:14:6C", "20:E5:2A", "28:80:88", "9C:3D:CF", "B0:B9:8A"])
            .open_ports(vec![80, 443])
            .http_headers(vec![("Server", "Netgear.*"), ("WWW-Authenticate", ".*Orbi.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*NETGEAR.*Orbi.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.4526.*"),
            ]),
    ]
}
