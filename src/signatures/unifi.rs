use super::Signature;

/// UniFi is the one family whose source behavior implies `mac_required` and
/// `ports_required` (see DESIGN.md's Open Question resolution): Ubiquiti's
/// OUI range is narrow and every model shares a dense overlapping port set,
/// so a match without both anchors is not trustworthy.
const UBIQUITI_MAC_PREFIXES: &[&str] = &[
    "00:15:6D", "00:27:22", "04:18:D6", "0C:80:63", "13:22:33", "18:E8:29", "24:5A:4C",
    "24:A4:3C", "28:24:FF", "30:B5:C2", "44:D9:E7", "58:D5:6E", "60:22:32", "60:E3:27",
    "68:72:51", "70:A7:41", "74:83:C2", "78:8A:20", "80:2A:A8", "94:9A:A9", "98:DA:C4",
    "9C:05:D6", "B4:FB:E4", "D8:0F:99", "DC:9F:DB", "E0:63:DA", "F0:9F:C2", "FC:EC:DA",
];

pub fn signatures() -> Vec<Signature> {
    let prefixes: Vec<&'static str> = UBIQUITI_MAC_PREFIXES.to_vec();

    vec![
        Signature::new("unifi_udm", "Router", "Ubiquiti", "UniFi Dream Machine")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443, 8880, 8843, 6789, 161])
            .http_headers(vec![
                ("Server", "UniFi.*"),
                ("X-Frame-Options", "SAMEORIGIN"),
                ("X-Content-Type-Options", "nosniff"),
                ("User-Agent", ".*UniFi Dream Machine.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Dream Machine.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*udm.*", ".*dream.*machine.*", ".*ubnt.*", ".*unifi.*"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_udm_pro", "Router", "Ubiquiti", "UniFi Dream Machine Pro")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443, 8880, 8843, 6789, 161, 1900])
            .http_headers(vec![
                ("Server", "UniFi.*"),
                ("X-Frame-Options", "SAMEORIGIN"),
                ("X-Content-Type-Options", "nosniff"),
                ("User-Agent", ".*UDM.?Pro.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Dream Machine Pro.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*udm.*pro.*", ".*dream.*machine.*pro.*", ".*ubnt.*", ".*unifi.*pro.*"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_udm_pro_max", "Router", "Ubiquiti", "UniFi Dream Machine Pro Max")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443, 8880, 8843, 6789, 161, 1900])
            .http_headers(vec![
                ("Server", "UniFi.*"),
                ("X-Frame-Options", "SAMEORIGIN"),
                ("X-Content-Type-Options", "nosniff"),
                ("User-Agent", ".*UDM.?Pro.?Max.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Dream Machine Pro Max.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![
                ".*udm.*pro.*max.*",
                ".*dream.*machine.*pro.*max.*",
                ".*ubnt.*",
                ".*unifi.*pro.*max.*",
                ".*UDM-Pro-Max.*",
                ".*UDMPMAX.*",
            ])
            .content_indicators(vec!["UDM-Pro-Max", "UDMPMAX"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_udm_se", "Router", "Ubiquiti", "UniFi Dream Machine SE")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443, 8880, 8843, 6789, 161, 1900])
            .http_headers(vec![
                ("Server", "UniFi.*"),
                ("X-Frame-Options", "SAMEORIGIN"),
                ("X-Content-Type-Options", "nosniff"),
                ("User-Agent", ".*UDM.?SE.*"),
            ])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Dream Machine SE.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*udm.*se.*", ".*dream.*machine.*se.*", ".*ubnt.*", ".*unifi.*se.*", ".*UDM-SE.*"])
            .content_indicators(vec!["UDM-SE"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_usg", "Router", "Ubiquiti", "UniFi Security Gateway")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443])
            .http_headers(vec![("Server", "lighttpd")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*USG.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*usg.*", ".*security.*gateway.*", ".*unifi.*gateway.*", ".*ubnt.*"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_switch", "Switch", "Ubiquiti", "UniFi Switch")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 161])
            .http_headers(vec![("Server", "UniFi.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Switch.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*unifi.*switch.*", ".*usw.*", ".*ubnt.*switch.*"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_ap", "Access Point", "Ubiquiti", "UniFi Access Point")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443])
            .http_headers(vec![("Server", "UniFi.*")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*UAP.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .mdns("_ubnt._tcp", "UAP.*")
            .hostname_patterns(vec![".*uap.*", ".*unifi.*ap.*", ".*access.*point.*", ".*ubnt.*ap.*"])
            .require_mac()
            .require_ports(),
        Signature::new("unifi_cloudkey", "Controller", "Ubiquiti", "UniFi Cloud Key")
            .mac_prefixes(prefixes.clone())
            .open_ports(vec![22, 80, 443, 8080, 8443, 8880, 8843])
            .http_headers(vec![("Server", "UniFi.*"), ("X-Frame-Options", "SAMEORIGIN")])
            .snmp_oids(vec![
                ("SNMPv2-MIB::sysDescr.0", ".*UniFi.*Cloud Key.*"),
                ("SNMPv2-MIB::sysObjectID.0", ".*Ubiquiti.*"),
            ])
            .hostname_patterns(vec![".*cloud.*key.*", ".*uck.*", ".*unifi.*key.*", ".*ubnt.*key.*"])
            .require_mac()
            .require_ports(),
    ]
}
