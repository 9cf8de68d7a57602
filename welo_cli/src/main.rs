use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use welo_core::health::{self, EnergyBalance};
use welo_core::journal::{self, GoalProgress};
use welo_core::nutrition::{self, NutritionFacts};
use welo_core::*;

#[derive(Parser)]
#[command(name = "welo")]
#[command(about = "Weight and calorie tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this data file instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how free-form quantities are understood
    Parse {
        /// Strings such as "183cm", "1h 5min" or "27.02.1992"
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Set the data file or information about yourself
    Config {
        /// Data file to use from now on; created when missing
        datafile: Option<PathBuf>,

        /// Your height
        #[arg(long, short = 'e')]
        height: Option<Length>,

        /// Your physical activity level (PAL)
        #[arg(long, short = 'a')]
        activity: Option<Activity>,

        /// Your birthday, to determine your age
        #[arg(long, short = 'b')]
        birthday: Option<Time>,

        /// Your sex
        #[arg(long, short = 's')]
        sex: Option<Sex>,

        /// Your goal weight
        #[arg(long, short = 'g')]
        goal_weight: Option<Mass>,
    },

    /// Log a new weight or list all measurements
    Weight {
        weight: Option<Mass>,

        /// Time of the measurement, defaults to now
        #[arg(long, short = 't')]
        time: Option<Time>,
    },

    /// Log a meal or show what you ate today
    #[command(after_help = PORTION_HELP)]
    Eat {
        /// Pairs of AMOUNT FOOD. FOOD may be `leftovers` (the last meal) or
        /// `leftovers(TIME)`, in which case AMOUNT is a portion of that meal
        #[arg(allow_negative_numbers = true)]
        food: Vec<String>,

        /// Name of the meal
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Time of the meal, defaults to now
        #[arg(long, short = 't')]
        time: Option<Time>,

        /// Show the meal without saving it
        #[arg(long, short = 'd')]
        dry: bool,

        /// Remove the last meal, or the one at --time
        #[arg(long, short = 'u', conflicts_with = "resize")]
        undo: bool,

        /// Resize the last meal, or the one at --time, to PORTION
        #[arg(long, short = 'r', value_name = "PORTION", allow_hyphen_values = true)]
        resize: Option<String>,

        /// Only eat PORTION of the listed food
        #[arg(long, short = 'p', value_name = "PORTION", allow_hyphen_values = true)]
        portion: Option<String>,
    },

    /// Manage nutrition information of foods
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// Store nutrition facts for a food
    Add {
        name: String,

        /// Facts such as energy=250kcal fat=3g carbs=48g protein=9g salt=1.2g
        #[arg(required = true, value_name = "FIELD=VALUE")]
        fields: Vec<String>,

        /// Amount of food the facts are given for
        #[arg(long, default_value = "100g")]
        reference: Mass,
    },

    /// Show nutrition facts of a food, or the closest matches
    Show { name: String },
}

const PORTION_HELP: &str = "\
PORTION is either a mass or a plain factor on the total weight of what it refers to.
A negative portion means everything minus that portion: for a 1000g meal, '0.2' is 200g,
while '-0.2' and '-200g' are both 800g.";

fn main() -> Result<()> {
    welo_core::logging::init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Config {
            datafile,
            height,
            activity,
            birthday,
            sex,
            goal_weight,
        } => {
            if let Some(datafile) = datafile {
                config.set_data_file(&datafile)?;
                config.save()?;
                println!("Set current data file to '{}'", config.data.data_file.display());
                if !config.data.data_file.exists() {
                    println!("Creating new data file '{}'..", config.data.data_file.display());
                    DataFile::default().save(&config.data.data_file)?;
                }
            }
            let path = cli.data_file.unwrap_or(config.data.data_file);
            let profile = Profile {
                height,
                activity,
                birthday,
                sex,
                weight: None,
                goal_weight,
            };
            cmd_config(&path, profile)
        }
        Commands::Weight { weight, time } => {
            let path = cli.data_file.unwrap_or(config.data.data_file);
            cmd_weight(&path, weight, time)
        }
        Commands::Eat {
            food,
            name,
            time,
            dry,
            undo,
            resize,
            portion,
        } => {
            let path = cli.data_file.unwrap_or(config.data.data_file);
            if undo {
                cmd_eat_undo(&path, time)
            } else if let Some(resize) = resize {
                cmd_eat_resize(&path, &resize, time, dry)
            } else if food.is_empty() {
                cmd_eat_info(&path, time)
            } else {
                let items = meal_items(food);
                let request = MealRequest {
                    name,
                    time: time.unwrap_or_else(Time::now),
                    items,
                    portion,
                    dry,
                };
                cmd_eat(&path, &request)
            }
        }
        Commands::Food { command } => {
            let path = cli.data_file.unwrap_or(config.data.data_file);
            match command {
                FoodCommands::Add {
                    name,
                    fields,
                    reference,
                } => cmd_food_add(&path, &name, &fields, reference),
                FoodCommands::Show { name } => cmd_food_show(&path, &name),
            }
        }
    }
}

fn cmd_parse(input: &[String]) -> Result<()> {
    for s in input {
        let quantity = welo_core::resolve(s)?;
        println!("{}: {}", quantity.kind(), quantity);
    }
    Ok(())
}

fn cmd_config(path: &Path, updates: Profile) -> Result<()> {
    let mut data = DataFile::load(path)?;

    if updates != Profile::default() {
        let profile = &mut data.profile;
        profile.height = updates.height.or(profile.height);
        profile.activity = updates.activity.or(profile.activity);
        profile.birthday = updates.birthday.or(profile.birthday);
        profile.sex = updates.sex.or(profile.sex);
        profile.goal_weight = updates.goal_weight.or(profile.goal_weight);
        data.save(path)?;
    }

    let profile = &data.profile;
    println!("Data file: '{}'", path.display());
    println!("sex: {}", show(profile.sex));
    println!("height: {}", show(profile.height));
    println!("age: {} years old", show(profile.birthday.map(|b| b.age())));
    println!("activity: {}", show(profile.activity));
    println!(
        "weight: {}, bmi: {}",
        show(profile.weight),
        show(profile.bmi().map(health::format_bmi))
    );
    println!("goal weight: {}", show(profile.goal_weight));
    println!();
    println!(
        "Basal metabolic rate: {} kcal/day",
        show(profile.bmr().map(whole_kcal))
    );
    println!(
        "Total energy expenditure: {} kcal/day",
        show(profile.total_energy_expenditure().map(whole_kcal))
    );
    Ok(())
}

fn cmd_weight(path: &Path, weight: Option<Mass>, time: Option<Time>) -> Result<()> {
    let Some(weight) = weight else {
        let data = DataFile::load(path)?;
        for entry in &data.weight {
            println!("{}: {}", entry.time, entry.weight);
        }
        return Ok(());
    };

    let report = DataFile::update(path, |data| {
        Ok(journal::log_weight(
            data,
            weight,
            time.unwrap_or_else(Time::now),
        ))
    })?;

    if let (Some(previous), Some(change)) = (&report.previous, report.change) {
        if change.kilograms() > 0.0 {
            println!(
                "You are up {} since your last measurement on {} @ {}",
                change, previous.time, previous.weight
            );
        } else {
            println!(
                "You are down {} since your last measurement on {} @ {}. Nice job!",
                -change, previous.time, previous.weight
            );
        }
    }
    if report.new_lowest {
        println!("This is your new lowest weight!");
    }
    if let Some(bmi) = report.bmi {
        println!("Your BMI is: {}", health::format_bmi(bmi));
    }
    match report.goal {
        Some(GoalProgress::Remaining { goal, remaining }) => {
            println!("You are {} away from your goal of {}!", remaining, goal)
        }
        Some(GoalProgress::Reached { goal }) => println!("You hit your goal weight of {}!", goal),
        None => {}
    }
    Ok(())
}

/// Pair up `AMOUNT FOOD AMOUNT FOOD ...`
fn meal_items(food: Vec<String>) -> Vec<MealItem> {
    if food.len() % 2 != 0 {
        Cli::command()
            .error(
                clap::error::ErrorKind::WrongNumberOfValues,
                "food must be given as AMOUNT FOOD pairs",
            )
            .exit();
    }
    food.chunks(2)
        .map(|pair| MealItem::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

fn cmd_eat(path: &Path, request: &MealRequest) -> Result<()> {
    let mut data = DataFile::load(path)?;
    let meal = journal::eat(&mut data, request)?;
    print_meal(&meal);

    if request.dry {
        println!("[Dry run - not logging meal]");
    } else {
        data.save(path)?;
    }
    Ok(())
}

fn cmd_eat_undo(path: &Path, time: Option<Time>) -> Result<()> {
    let meal = DataFile::update(path, |data| journal::undo_meal(data, time.as_ref()))?;
    println!("Removed:");
    print_meal(&meal);
    Ok(())
}

fn cmd_eat_resize(path: &Path, portion: &str, time: Option<Time>, dry: bool) -> Result<()> {
    let mut data = DataFile::load(path)?;
    let before = journal::resize_meal(&mut data, portion, time.as_ref())?;

    println!("Before resizing:");
    print_meal(&before);
    let index = journal::find_meal(&data, Some(&before.time))?;
    print_meal(&data.meals[index]);

    if !dry {
        data.save(path)?;
    }
    Ok(())
}

fn cmd_eat_info(path: &Path, start: Option<Time>) -> Result<()> {
    let data = DataFile::load(path)?;
    let today = chrono::Local::now().date_naive();
    let start = start.unwrap_or_else(|| Time::start_of_day(today));

    let meals = journal::meals_in_day(&data, start);
    if !meals.is_empty() {
        println!("Your meals since {}:\n", start);
        for meal in &meals {
            print_meal(meal);
        }

        let totals = journal::day_totals(meals.iter().copied());
        println!("# Total");
        print_facts(&totals);

        if let Some(expenditure) = data.profile.total_energy_expenditure() {
            println!();
            println!(
                "With your total energy expenditure being {} kcal/day, you are currently at {}",
                whole_kcal(expenditure),
                EnergyBalance::new(expenditure, totals.energy)
            );
        }
    } else if let Some(last) = data.meals.last() {
        println!("You haven't eaten today yet.");
        let elapsed = Time::now().datetime() - last.time.datetime();
        println!("Your last meal was {} ago.", journal::format_elapsed(elapsed));
    }
    Ok(())
}

fn cmd_food_add(path: &Path, name: &str, fields: &[String], reference: Mass) -> Result<()> {
    let pairs = fields
        .iter()
        .map(|field| {
            field
                .split_once('=')
                .ok_or_else(|| Error::Nutrient(format!("expected FIELD=VALUE, got '{}'", field)))
        })
        .collect::<Result<Vec<_>>>()?;

    let facts = NutritionFacts::from_fields(pairs, reference)?;
    let key = records::food_key(name);

    DataFile::update(path, |data| {
        if data.food_cache.insert(key.clone(), facts).is_some() {
            tracing::warn!("Replacing nutrition information for '{}'", key);
        }
        Ok(())
    })?;

    println!("Nutritional information for 100g of '{}':", key);
    print_facts(&facts);
    Ok(())
}

fn cmd_food_show(path: &Path, name: &str) -> Result<()> {
    let data = DataFile::load(path)?;
    let key = records::food_key(name);

    match data.food_cache.get(&key) {
        Some(facts) => {
            println!("Nutritional information for 100g of '{}':", key);
            print_facts(facts);
        }
        None => {
            println!("No exact matches found.");
            println!("Closest matches:");
            let names = data.food_cache.keys().map(String::as_str);
            for name in nutrition::closest_matches(&key, names) {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn print_meal(meal: &Meal) {
    println!("# {} @ {}", meal.display_name(), meal.time);
    let items: Vec<String> = meal
        .food
        .iter()
        .map(|item| format!("{} \"{}\"", item.amount, item.name))
        .collect();
    println!("{}", items.join(" + "));
    println!("Total weight: {}", journal::meal_weight(meal));
    print_facts(&journal::meal_totals(meal));
    println!();
}

fn print_facts(facts: &NutritionFacts) {
    for (nutrient, value) in facts.entries() {
        println!("{}: {}", nutrient, value);
    }
}

fn whole_kcal(energy: Energy) -> i64 {
    energy.kcal().round() as i64
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}
