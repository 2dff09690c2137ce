mod dry_run;
mod facts;
mod path_escape;
