use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use serde::Deserialize;

use rs_pwgen_core::io::{list_files, normalize_folder};
use rs_pwgen_core::password::{
	Constraints, GenerationError, Generator, RandomSource, SystemRandom, WordList, DEFAULT_MAX_ATTEMPTS,
};

/// Command line / environment configuration.
#[derive(Parser, Debug)]
#[command(name = "rs-pwgen-server", version, about = "HTTP password generator")]
struct Args {
	/// Address to bind.
	#[arg(long, env = "PWGEN_HOST", default_value = "127.0.0.1")]
	host: String,

	/// Port to bind.
	#[arg(long, env = "PWGEN_PORT", default_value_t = 5000)]
	port: u16,

	/// Folder holding `<name>.txt` word lists.
	#[arg(long, env = "PWGEN_DATA", default_value = "./data")]
	data: String,

	/// Word list loaded at startup (file stem inside the data folder).
	#[arg(long, env = "PWGEN_WORD_LIST", default_value = "dicelist")]
	word_list: String,

	/// Word draws allowed per item before giving up.
	#[arg(long, env = "PWGEN_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
	max_attempts: usize,

	/// Largest item count a single request may ask for.
	#[arg(long, env = "PWGEN_MAX_COUNT", default_value_t = DEFAULT_MAX_COUNT)]
	max_count: usize,
}

const DEFAULT_MAX_COUNT: usize = 100;

#[derive(Deserialize)]
struct WordListQuery {
	name: Option<String>,
}

/// The currently loaded word list. Replaced wholesale, never edited.
struct SharedData {
	word_list: Arc<WordList>,
}

/// Read-only settings shared by all workers.
struct Settings {
	data_folder: PathBuf,
	max_attempts: usize,
	max_count: usize,
}

/// Maps a generation failure to a status code.
fn error_response(e: &GenerationError) -> HttpResponse {
	let mut builder = match e {
		GenerationError::NoCharacterClassSelected | GenerationError::EmptyAlphabet(_) => HttpResponse::BadRequest(),
		GenerationError::WordListUnavailable => HttpResponse::ServiceUnavailable(),
		GenerationError::ConstraintsUnsatisfiable { .. } => HttpResponse::UnprocessableEntity(),
	};
	builder.body(e.to_string())
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one password from the loaded word list and the query's
/// constraints. Returns the password as the response body.
///
/// # Notes
/// - Every query field is optional, missing ones take `Constraints::default()`.
/// - A malformed query (unknown separator, negative `max_len`) is a `400`
///   from the extractor; a non-numeric `count` falls back to the default.
/// - Generation runs on the blocking pool since a hard word list can keep
///   the rejection loop busy for up to `max_attempts` draws per item.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	settings: web::Data<Settings>,
	query: web::Query<Constraints>,
) -> impl Responder {
	let constraints = query.into_inner();
	if constraints.item_count() > settings.max_count {
		return HttpResponse::BadRequest()
			.body(format!("count must be at most {}, got {}", settings.max_count, constraints.item_count()));
	}

	// Clone the Arc out so generation runs without the lock
	let word_list = match data.lock() {
		Ok(shared) => Arc::clone(&shared.word_list),
		Err(_) => return HttpResponse::InternalServerError().body("Word list lock failed"),
	};

	let max_attempts = settings.max_attempts;
	let generated = web::block(move || {
		let mut rng = SystemRandom::new();
		Generator::new(&word_list)
			.with_max_attempts(max_attempts)
			.generate(&constraints, &mut rng)
	})
	.await;

	match generated {
		Ok(Ok(password)) => HttpResponse::Ok().body(password),
		Ok(Err(e)) => {
			log::info!("generation refused: {e}");
			error_response(&e)
		}
		Err(_) => HttpResponse::InternalServerError().body("Generation task failed"),
	}
}

/// Reports whether passwords come from a cryptographic source.
#[get("/v1/entropy")]
async fn get_entropy() -> impl Responder {
	if SystemRandom::new().is_cryptographic() {
		HttpResponse::Ok().body("cryptographic")
	} else {
		HttpResponse::Ok().body("fallback")
	}
}

#[get("/v1/word_lists")]
async fn get_word_lists(settings: web::Data<Settings>) -> impl Responder {
	match list_files(&settings.data_folder, "txt") {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list word lists"),
	}
}

#[get("/v1/loaded_word_list")]
async fn get_loaded_word_list(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Word list lock failed"),
	};
	let list = &shared.word_list;
	HttpResponse::Ok().body(format!("{}\n{}\n{:.2}", list.name(), list.len(), list.average_len()))
}

#[put("/v1/load_word_list")]
async fn put_word_list(
	data: web::Data<Mutex<SharedData>>,
	settings: web::Data<Settings>,
	query: web::Query<WordListQuery>,
) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty word list name"),
	};
	if name.contains(['/', '\\']) || name.contains("..") {
		return HttpResponse::BadRequest().body("Invalid word list name");
	}

	let path = settings.data_folder.join(format!("{name}.txt"));
	let word_list = match WordList::from_file_cached(&path) {
		Ok(list) => list,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load word list: {e}")),
	};

	let mut shared = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Word list lock failed"),
	};
	log::info!("word list '{}' loaded ({} entries)", word_list.name(), word_list.len());
	shared.word_list = Arc::new(word_list);

	HttpResponse::Ok().body("Word list loaded successfully")
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_entropy)
		.service(get_word_lists)
		.service(get_loaded_word_list)
		.service(put_word_list);
}

/// Main entry point for the server.
///
/// Loads the startup word list, wraps it in a `Mutex` for thread safety,
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - A missing startup word list is not fatal: letter-based requests get
///   `503` until a list is loaded through `/v1/load_word_list`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	let args = Args::parse();

	let data_folder = normalize_folder(&args.data);
	let startup_path = data_folder.join(format!("{}.txt", args.word_list));
	let word_list = match WordList::from_file_cached(&startup_path) {
		Ok(list) => list,
		Err(e) => {
			log::warn!("could not load {}: {e}", startup_path.display());
			WordList::default()
		}
	};

	if !SystemRandom::new().is_cryptographic() {
		log::warn!("no cryptographic entropy source, passwords are predictable");
	}

	let shared_data = web::Data::new(Mutex::new(SharedData { word_list: Arc::new(word_list) }));
	let settings = web::Data::new(Settings {
		data_folder,
		max_attempts: args.max_attempts,
		max_count: args.max_count,
	});

	log::info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET", "PUT"]))
			.app_data(shared_data.clone())
			.app_data(settings.clone())
			.configure(routes)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
