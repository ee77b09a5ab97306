/*!

This is the long-form manual for `interest_tally` and `interest-report`.

## Input

A roster is a table with one row per student. One column holds the name of the
student, and several columns hold the areas of interest. By default they are:

* `Name`
* `Area_of_Interest_1`, `Area_of_Interest_2`, `Area_of_Interest_3`
* `Mention_Other_Area`

Each interest cell may be empty, or contain one or several interests separated
by commas. Blank entries (`", ,"`) are ignored.

The following formats are supported by the command line:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel spreadsheets. The first row is the header.

## Normalization

The answers of a survey are rarely consistent: `AI/ML`, `ai/ml` and `Ai/ML`
all mean the same thing. Each interest is folded (trimmed, whitespace
collapsed, lower case) and looked up in a taxonomy of synonyms. A known synonym
is replaced by its canonical label. An unknown interest is kept as it is.
By default, the labels are then upper-cased, so that `Blockchain` and
`BLOCKCHAIN` end up being the same interest even if the taxonomy does not know
about them.

The taxonomy can be replaced in the configuration file:

```json
{
  "taxonomy": {
    "ai/ml": "AI/ML",
    "machine learning": "AI/ML"
  }
}
```

## Counting

Two counting rules are available:

* `perStudent` (default): the count of an interest is the number of students
  who mentioned it. Mentioning the same interest in two columns counts once.
* `perMention`: every mention counts.

## Top N

For charts with many small categories, `topN` keeps the N interests with the
highest counts and merges all the others into one `OTHER` row. The total count
is unchanged. The `OTHER` row only appears if something was merged.

## Configuration file

```json
{
  "outputSettings": { "reportName": "Fall survey" },
  "rosterSources": [
    {
      "provider": "csv",
      "filePath": "student_interests.csv",
      "nameColumn": "Name",
      "interestColumns": ["Area_of_Interest_1", "Area_of_Interest_2", "Area_of_Interest_3", "Mention_Other_Area"]
    }
  ],
  "rules": { "countBasis": "perStudent", "uppercaseOutput": true, "topN": 7 }
}
```

All the sources are concatenated. File paths are relative to the configuration file.

*/
