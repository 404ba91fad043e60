// WHY: Widely used acronyms are either too short or too ambiguous for the automatic filter,
// but within one country they reliably name one institution

/// (country, pattern, canonical name) triples inserted after the ambiguity filter
/// Canonical names must match the registry name with any bracketed qualifier removed
pub const MANUAL_OVERRIDES: &[(&str, &str, &str)] = &[
    ("United States", "mit", "Massachusetts Institute of Technology"),
    ("United States", "caltech", "California Institute of Technology"),
    ("United States", "ucla", "University of California, Los Angeles"),
    ("United States", "uc berkeley", "University of California, Berkeley"),
    ("United States", "ucsf", "University of California, San Francisco"),
    ("United States", "upenn", "University of Pennsylvania"),
    ("United States", "nih", "National Institutes of Health"),
    ("United Kingdom", "ucl", "University College London"),
    ("United Kingdom", "lse", "London School of Economics and Political Science"),
    ("Switzerland", "eth zurich", "ETH Zurich"),
    ("Switzerland", "epfl", "École Polytechnique Fédérale de Lausanne"),
    ("China", "ustc", "University of Science and Technology of China"),
    ("Singapore", "nus", "National University of Singapore"),
    ("Singapore", "ntu", "Nanyang Technological University"),
    ("Hong Kong", "hkust", "Hong Kong University of Science and Technology"),
    ("France", "cnrs", "French National Centre for Scientific Research"),
    ("Japan", "riken", "RIKEN"),
];
