pub mod swimmingresults;
