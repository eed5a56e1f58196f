#![no_main]

use killscope::correlation::correlate;
use killscope::dataset::IterationDataset;
use killscope::scoring::per_test_stats;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and scoring must reject bad input with an error, never panic
        if let Ok(dataset) = IterationDataset::from_json_str(input) {
            let _ = per_test_stats(&dataset);
            let _ = correlate(&dataset);
        }
    }
});
