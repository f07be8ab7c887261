#![no_main]

use libfuzzer_sys::fuzz_target;
use mongo_connectivity::descriptor::ConnectionDescriptor;

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = std::str::from_utf8(data) else {
        return;
    };

    // A parsed descriptor must survive render and reparse with every option intact.
    if let Ok(descriptor) = ConnectionDescriptor::from_uri(uri) {
        let rendered = descriptor.to_connection_string();
        let reparsed = ConnectionDescriptor::from_uri(&rendered)
            .expect("rendered connection string must parse");
        assert_eq!(reparsed, descriptor);
        assert_eq!(reparsed.to_connection_string(), rendered);
        let _ = descriptor.to_redacted_string();
    }
});
