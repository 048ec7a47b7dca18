use super::Signature;

pub fn signatures() -> Vec<Signature> {
    let prefixes = vec!["00:11:32", "00:24:8D", "28:C6:8E", "90:FB:5B", "BC:EE:7B", "00:C0:A8"];

    vec![
        Signature::new("synology_diskstation", "NAS", "Synology", "DiskStation")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 5000, 5001, 5005, 5006, 139, 445, 111, 2049])
            .http_headers(vec![
                ("Server", "nginx"),
                ("X-Powered-By", "PHP.*"),
                ("Set-Cookie", ".*id=.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*Synology.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Synology.*"),
            ])
            .mdns("_http._tcp", ".*DiskStation.*"),
        Signature::new("synology_ds220plus", "NAS", "Synology", "DS220+")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 5000, 5001, 139, 445, 111, 2049])
            .http_headers(vec![
                ("Server", "nginx"),
                ("X-Powered-By", "PHP.*"),
                ("Set-Cookie", ".*id=.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*DS220\\+.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Synology.*"),
            ]),
    ]
}
