use clap::{value_t, value_t_or_exit, App, Arg};
use poparchive::*;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

fn main() {
    let matches = App::new("archive_roundtrip")
        .arg(
            Arg::with_name("popsize")
                .short("N")
                .long("popsize")
                .help("Diploid population size")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("nmutations")
                .short("m")
                .long("nmutations")
                .help("Number of segregating mutations to generate")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("outfile")
                .short("o")
                .long("outfile")
                .help("Name of the output archive file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("S")
                .long("seed")
                .help("Random number seed")
                .takes_value(true),
        )
        .get_matches();

    let popsize = value_t!(matches.value_of("popsize"), u32).unwrap_or(100);
    let nmutations = value_t!(matches.value_of("nmutations"), usize).unwrap_or(50);
    let seed = value_t!(matches.value_of("seed"), u64).unwrap_or(42);
    let outfile = value_t_or_exit!(matches.value_of("outfile"), String);

    let genome_length: i64 = 1_000_000;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let effect_sizes = Exp::new(10.0).unwrap();

    let mut pop = Population::new(popsize, genome_length).unwrap();
    pop.generation = 1;
    for _ in 0..nmutations {
        let neutral = rng.gen_bool(0.9);
        pop.mutations.push(Mutation {
            position: Position::new_valid(rng.gen_range(0..genome_length)),
            effect_size: if neutral {
                0.0
            } else {
                -effect_sizes.sample(&mut rng)
            },
            dominance: 1.0,
            origin: 1,
            label: 0,
            neutral,
        });
    }
    pop.mcounts = (0..nmutations)
        .map(|_| rng.gen_range(1..2 * popsize))
        .collect();
    pop.mcounts_from_preserved_nodes = vec![0; nmutations];
    pop.genetic_value_matrix = (0..popsize).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let archive = PopulationArchive::new();
    let mut writer = std::io::BufWriter::new(std::fs::File::create(&outfile).unwrap());
    archive.serialize(&pop, &mut writer).unwrap();
    drop(writer);

    let mut reader = std::io::BufReader::new(std::fs::File::open(&outfile).unwrap());
    let reloaded = archive.deserialize(&mut reader).unwrap();
    assert_eq!(reloaded, pop);

    println!(
        "poparchive {}: wrote and reloaded {} with {} diploids, {} mutations, generation {}",
        version(),
        outfile,
        reloaded.num_diploids,
        reloaded.mutations.len(),
        reloaded.generation,
    );
}
