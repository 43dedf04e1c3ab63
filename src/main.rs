// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;

use aras_spectra::cli::ArasSpectra;

fn main() {
    // Stops here if the arguments were invalid (and prints why).
    let args = ArasSpectra::parse();

    if let Err(e) = args.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
