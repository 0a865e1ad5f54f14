/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (model, base price new, engine size, typical mpg)
    let models: [(&str, f64, f64, f64); 8] = [
        ("1 Series", 26_000.0, 1.5, 52.0),
        ("2 Series", 29_000.0, 1.5, 50.0),
        ("3 Series", 35_000.0, 2.0, 48.0),
        ("5 Series", 45_000.0, 2.0, 45.0),
        ("X1", 32_000.0, 1.5, 46.0),
        ("X3", 42_000.0, 2.0, 44.0),
        ("X5", 60_000.0, 3.0, 32.0),
        ("M4", 75_000.0, 3.0, 28.0),
    ];
    let fuel_types = ["Diesel", "Petrol", "Hybrid"];
    let transmissions = ["Automatic", "Manual", "Semi-Auto"];

    let output_path = "bmw.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "model",
            "year",
            "price",
            "mileage",
            "fuelType",
            "transmission",
            "mpg",
            "engineSize",
            "tax",
        ])
        .expect("Failed to write header");

    let n_rows = 400;
    for _ in 0..n_rows {
        let &(model, base_price, engine_size, base_mpg) = rng.pick(&models);
        let fuel = *rng.pick(&fuel_types);
        let transmission = *rng.pick(&transmissions);

        let year = 2014 + (rng.next_u64() % 9) as i32;
        let age = (2022 - year) as f64;

        let mileage = (rng.gauss(9_000.0, 2_500.0).max(500.0) * (age + 0.5)).round();
        // ~12% depreciation per year plus mileage wear and noise.
        let price = (base_price * 0.88_f64.powf(age) - mileage * 0.04
            + rng.gauss(0.0, base_price * 0.04))
        .max(1_500.0)
        .round();

        let fuel_mpg_factor = match fuel {
            "Diesel" => 1.12,
            "Hybrid" => 1.35,
            _ => 1.0,
        };
        let mpg = (base_mpg * fuel_mpg_factor + rng.gauss(0.0, 2.0)).max(15.0);
        let tax = if mpg > 55.0 { 30.0 } else if mpg > 45.0 { 125.0 } else { 145.0 };

        writer
            .write_record([
                model.to_string(),
                year.to_string(),
                format!("{price:.0}"),
                format!("{mileage:.0}"),
                fuel.to_string(),
                transmission.to_string(),
                format!("{mpg:.1}"),
                format!("{engine_size:.1}"),
                format!("{tax:.0}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} listings to {output_path}");
}
