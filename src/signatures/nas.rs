use super::Signature;

pub fn signatures() -> Vec<Signature> {
    vec![
        Signature::new("qnap_nas", "NAS", "QNAP", "NAS")
            .mac_prefixes(vec!["00:08:9B", "00:1F:1F", "24:5E:BE", "00:17:31", "EC:A0:FB"])
            .open_ports(vec![22, 80, 443, 139, 445, 111, 2049, 8080, 6000, 10000])
            .http_headers(vec![
                ("Server", "http.*"),
                ("X-Powered-By", "QTS.*"),
                ("Set-Cookie", ".*NASID.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*QNAP.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*"),
            ])
            .mdns("_http._tcp", "QNAP.*")
            .hostname_patterns(vec![".*qnap.*", ".*nas.*"]),
        // Software NAS OS; no stable OUI, so this signature has an empty
        // mac_prefixes list and leans entirely on HTTP/SNMP evidence.
        Signature::new("truenas", "NAS", "iXsystems", "TrueNAS")
            .open_ports(vec![22, 80, 443, 139, 445, 111, 2049, 9000])
            .http_headers(vec![
                ("Server", "nginx"),
                ("X-Frame-Options", "SAMEORIGIN"),
                ("X-Powered-By", ".*freenas.*|.*truenas.*"),
            ])
            .snmp_oids(vec![("SNMPv2-MIB::sysDescr.0", ".*TrueNAS.*|.*FreeNAS.*")]),
    ]
}
