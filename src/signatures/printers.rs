use super::Signature;

pub fn signatures() -> Vec<Signature> {
    let prefixes = vec!["00:05:9B", "00:0F:EA", "00:12:79", "00:18:71", "00:1C:C4", "00:25:B3"];

    vec![
        Signature::new("hp_laserjet", "Printer", "HP", "LaserJet")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![80, 443, 515, 631, 9100])
            .http_headers(vec![("Server", "HP HTTP Server.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*HP LaserJet.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*HP.*"),
            ])
            .mdns("_http._tcp", "HP LaserJet.*"),
        Signature::new("hp_officejet", "Printer", "HP", "OfficeJet")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![80, 443, 515, 631, 9100])
            .http_headers(vec![("Server", "HP-ChaiSOE.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*HP Officejet.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*HP.*"),
            ])
            .mdns("_http._tcp", "HP OfficeJet.*"),
    ]
}
