#![no_main]

use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mongo_connectivity::descriptor::{ConnectionAttributes, ConnectionDescriptor};

#[derive(Debug)]
struct AttributesInput {
    auth_strategy: u8,
    ssl_method: u8,
    hostname: String,
    port: u16,
    username: String,
    password: String,
    raw: String,
}

impl<'a> Arbitrary<'a> for AttributesInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> libfuzzer_sys::arbitrary::Result<Self> {
        Ok(Self {
            auth_strategy: u.arbitrary()?,
            ssl_method: u.arbitrary()?,
            hostname: u.arbitrary()?,
            port: u.arbitrary()?,
            username: u.arbitrary()?,
            password: u.arbitrary()?,
            raw: u.arbitrary()?,
        })
    }
}

const STRATEGIES: [&str; 6] = ["NONE", "MONGODB", "SCRAM-SHA-256", "KERBEROS", "LDAP", "X509"];
const SSL_METHODS: [&str; 5] = ["NONE", "SYSTEMCA", "UNVALIDATED", "SERVER", "ALL"];

fuzz_target!(|input: AttributesInput| {
    // Arbitrary text must never panic the parser.
    let _ = ConnectionAttributes::from_json(&input.raw);

    let strategy = STRATEGIES[input.auth_strategy as usize % STRATEGIES.len()];
    let json = serde_json::json!({
        "hostname": input.hostname,
        "port": input.port,
        "authStrategy": strategy,
        "sslMethod": SSL_METHODS[input.ssl_method as usize % SSL_METHODS.len()],
        "mongodbUsername": input.username,
        "mongodbPassword": input.password,
        "kerberosPrincipal": input.username,
        "ldapUsername": input.username,
        "ldapPassword": input.password,
    });

    if let Ok(attributes) = ConnectionAttributes::from_json(&json.to_string()) {
        if let Ok(descriptor) = ConnectionDescriptor::from_attributes(attributes) {
            assert_eq!(descriptor.auth().kind().as_str(), strategy);
            let _ = descriptor.to_connection_string();
            let _ = descriptor.to_redacted_string();
        }
    }
});

