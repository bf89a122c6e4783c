// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hbinder::Parcel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Length-prefixed readers
    let mut p = Parcel::unmarshall(data);
    let _ = p.read_string();
    let _ = p.read_byte_array();
    let _ = p.read_string_array();

    // Envelope readers
    let mut p = Parcel::unmarshall(data);
    let _ = p.enforce_interface("fuzz.IService");
    let _ = p.read_exception();

    // Object slots without an object table
    let mut p = Parcel::unmarshall(data);
    let _ = p.read_file_descriptor();
    let _ = p.read_binder();
});
