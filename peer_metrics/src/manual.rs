/*!

This is the long-form manual for `peer_metrics` and the `peer` command line tool.

## Input formats

The following formats are supported for the district dataset:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel spreadsheet

### The district dataset

One row per district, one column per field. The first row holds the column names.
Three columns are mandatory:

| column                | content                                       |
|-----------------------|-----------------------------------------------|
| `RCDTS`               | the district identifier                       |
| `District Name (IRC)` | the display name of the district              |
| `Total ASE`           | the adjusted student enrollment (non-negative)|

The aggregate row for the whole state is the row named `State of Illinois`. Its enrollment
may be zero, in which case all the per-pupil figures are 0.

The other columns are read by name. They are grouped into families:

- adequacy targets: `Adequacy Target`, `Adequacy Target Per Student`, `Adequate <position>`
- actual levels: `Actual Resources`, `Actual Resources Per Student`, `Actual <position> Count (EIS)`,
  `Actual <position> Count (IRC)`, `Actual EL Teachers (EIS)`
- gaps: `Adequacy Funding Gap`, `Adequacy Funding Gap Per Student`, `<position> Gap (EIS)`,
  `<position> Gap (IRC)`
- gaps per school: `Adequacy Funding Gap Per School`, `<position> Gap Per School`
- shares (fractions between 0 and 1): the demographic groups and the revenue sources, all
  ending with ` (%)`
- `Adequacy Level`: the fraction of adequate funding the district has

The exact list of column names is in [`crate::CATEGORY_FIELDS`], [`crate::DEMOGRAPHIC_FIELDS`]
and [`crate::REVENUE_FIELDS`]. A missing column or an empty cell is a missing value: the
corresponding entry in the output is `null`, but the row is still present.

Numbers may be written with thousands separators (`1,234,567`) and a leading `$`. A trailing `%`
divides the number by 100.

### `csv`

```text
RCDTS,District Name (IRC),Total ASE,Adequacy Target,Actual Resources,...
000000000000000,State of Illinois,0,"$40,000,000,000","$33,000,000,000",...
010010010260000,Payson CUSD 1,712.4,9800000,8100000,...
```

### `xlsx`

The worksheet given with `--excel-worksheet-name` (or `excelWorksheetName` in the configuration)
is used. Without a name, the workbook must have exactly one worksheet.

### Legislative coverage

A CSV file describing which school districts are in each legislative district:

```text
Chamber,District Number,Legislator Name,RCDTS,School District,Total Students,Share of Students
Senate,12,Jane Doe,010010010260000,Payson CUSD 1,712,0.04
```

## Configuration

`peer` comes with sensible defaults, but the inputs can also be described in a JSON
configuration file. Paths are relative to the directory of the configuration file. Command line
flags take precedence over the configuration.

```json
{
  "outputSettings": {
    "reportName": "PEER district lookup",
    "outputFile": "report.json",
    "displayUnits": "perPupil"
  },
  "dataSource": {
    "provider": "csv",
    "filePath": "app_data_wide.csv"
  },
  "coverageSource": {
    "provider": "csv",
    "filePath": "leg_dist_coverage.csv"
  },
  "district": "State of Illinois"
}
```

`displayUnits` is `total` (default) or `perPupil`.

## The report

The report is a JSON document with the headline figures of the district (adequate funding,
actual funding and the gap, in the requested units), the long-format resource table, the
staffing needs by position, the demographic and revenue shares, and optionally the legislative
view.

For the statewide row, the gap is the most negative gap observed across all the districts of the
dataset, and not the difference between the statewide totals.

A gap of zero or more is reported as a `surplus`, a negative gap as a `gap`.

 */
