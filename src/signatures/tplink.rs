use super::Signature;

pub fn signatures() -> Vec<Signature> {
    let prefixes = vec![
        "14:CC:20", "14:CF:E2", "18:A6:F7", "1C:3B:F3", "1C:61:B4", "1C:FA:68", "54:C8:0F",
        "60:E3:27", "64:56:01", "90:F6:52", "94:D9:B3", "BC:46:99",
    ];

    vec![
        Signature::new("tplink_archer", "Router", "TP-Link", "Archer")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![80, 443])
            .http_headers(vec![
                ("Server", "TP-LINK.*"),
                ("WWW-Authenticate", "Basic realm=\"TP-LINK.*\""),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*TP-LINK.*Archer.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*"),
            ])
            .mdns("_http._tcp", "TP-LINK.*"),
        Signature::new("tplink_deco", "Router", "TP-Link", "Deco")
            .mac_prefixes(vec!["14:CC:20", "14:CF:E2", "18:A6:F7", "1C:3B:F3", "1C:61:B4", "1C:FA:68", "54:C8:0F", "60:E3:27", "90:F6:52"])
            .open_ports(vec![80, 443, 8080])
            .http_headers(vec![("Server", "TP-LINK.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*TP-LINK.*Deco.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*"),
            ]),
    ]
}
