mod diff_consistency;
mod staging;
