// Two security tiers: public endpoints need no session (/auth/*), protected
// ones sit behind the session-cookie middleware (/api/*).
pub mod protected;
pub mod public;
