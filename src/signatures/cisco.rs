use super::Signature;

pub fn signatures() -> Vec<Signature> {
    let prefixes = vec![
        "00:0A:41", "00:0B:45", "00:0C:86", "00:0D:65", "00:0E:38", "00:0F:23", "00:1A:A1",
        "00:1B:0C", "00:1C:57", "00:1D:A2", "70:81:05", "F8:72:EA", "00:11:5C", "00:17:94",
        "7C:69:F6",
    ];

    vec![
        Signature::new("cisco_catalyst", "Switch", "Cisco", "Catalyst")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 23, 80, 443, 161, 162, 514])
            .http_headers(vec![("Server", "cisco.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Cisco IOS.*Catalyst.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.9.*"),
            ]),
        Signature::new("cisco_isr", "Router", "Cisco", "ISR")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 23, 80, 443, 161, 162, 500, 514])
            .http_headers(vec![("Server", "cisco.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Cisco IOS.*ISR.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.9.*"),
            ]),
        Signature::new("cisco_asa", "Firewall", "Cisco", "ASA")
            .mac_prefixes(vec!["00:0A:41", "00:0B:45", "00:0C:86", "00:0D:65", "00:1A:A1", "70:81:05", "C4:7D:4F"])
            .open_ports(vec![22, 23, 80, 443, 161, 162, 8443])
            .http_headers(vec![("Server", "Adaptive Security Appliance.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Cisco Adaptive Security Appliance.*"),
                ("SNMPv2-MIB::sysObjectID.0", "1.3.6.1.4.1.9.*"),
            ]),
        Signature::new("cisco_meraki", "Cloud Controller", "Cisco", "Meraki")
            .mac_prefixes(vec!["0C:8D:DB", "34:56:FE", "88:15:44", "E0:55:3D", "00:18:0A"])
            .open_ports(vec![80, 443, 8080, 8443])
            .http_headers(vec![("Server", "nginx"), ("X-Meraki", ".*")])
            .snmp_oids(vec![("SNMPv2-MIB::sysDescr.0", ".*Meraki.*")]),
    ]
}
