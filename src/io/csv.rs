/*!
# I/O Utilities for Saving Posterior Samples to CSV

This module provides a function to save ABC posterior samples to CSV files. Enable via the `csv` feature.
*/

use ndarray::{Array2, Axis};
use std::error::Error;
use std::fs::File;

use csv::Writer;

/**
Saves posterior samples as a CSV file.

The data is expected to be in a shape of **chain × sample**, as returned by
[`ChainRunner::run`](crate::core::ChainRunner::run).

The resulting CSV file will have:
- A header row containing `"chain"`, `"sample"` and `"theta"`.
- Each subsequent row will correspond to a single sample of a specific chain.

# Arguments

* `data` - An `Array2<T>` containing the posterior samples.
* `filename` - The file path where the CSV data will be written.

# Returns

Returns `Ok(())` if successful, or an error if any I/O or CSV formatting
issue occurs.

# Examples

```rust
use mini_abc::io::csv::save_csv;
use ndarray::arr2;

let data = arr2(&[[0.04, 0.05], [0.06, 0.03]]);
save_csv(&data, "/tmp/posterior.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_csv<T: std::fmt::Display>(
    data: &Array2<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["chain", "sample", "theta"])?;

    for (chain_idx, chain) in data.axis_iter(Axis(0)).enumerate() {
        for (sample_idx, theta) in chain.iter().enumerate() {
            wtr.write_record(&[
                chain_idx.to_string(),
                sample_idx.to_string(),
                theta.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    log::debug!(
        "saved {} posterior samples from {} chains to {filename}",
        data.len(),
        data.nrows()
    );
    Ok(())
}
