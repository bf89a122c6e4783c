// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hbinder::{Bundle, DecodeOptions, Parcel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Strict decode: header, full materialization, pass-through re-encode
    let mut input = Parcel::unmarshall(data);
    if let Ok(bundle) = Bundle::read_from_parcel(&mut input, DecodeOptions::new().max_depth(8)) {
        let consumed = input.data_position();
        let mut echo = Parcel::new();
        if bundle.write_to_parcel(&mut echo).is_ok() {
            assert_eq!(echo.data(), &data[..consumed]);
        }
        let _ = bundle.entries();
        let _ = bundle.to_string();
    }

    // Defusing decode never fails once the header is accepted
    let mut input = Parcel::unmarshall(data);
    if let Ok(bundle) = Bundle::read_from_parcel(&mut input, DecodeOptions::defusing().max_depth(8)) {
        assert!(bundle.size().is_ok());
    }
});
