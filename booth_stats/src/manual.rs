/*!

This is the long-form manual for `booth_stats` and `boothstats`.

## Booth records

Every booth (polling station) of an assembly constituency carries, for each election
year, the number of votes polled and the share of every party or candidate. Shares are
fractions in `[0, 1]`. A year for which the booth has no data is absent, not zero.

The raw mappings are not clean. They may contain pseudo-keys that are not candidates
(`VOTERS`, `NOTA`, `PS_NO`, `POLLED`, also suffixed by a year such as `VOTERS_2021`), and
values that are not numbers (`"NEW_BOOTH"`). Pseudo-keys are always dropped, and values
that cannot be read count as 0. Reading a record never fails.

`OTHERS` is the catch-all bucket of the minor candidates. It counts in the vote shares
but never wins or comes second in a booth.

## Statistics

* `assembly_overview` the assembly totals for one year: booths, votes polled, estimated
  electorate (votes polled times the turnout factor, 1.25 by default), turnout and the
  vote share of the parties, largest first, rounded to one decimal.
* `electoral_trends` the shares of a fixed roster of parties for each year (two decimals),
  and the swings between consecutive years. Swings that round to 0.00 are left out.
* `weak_booths` the booths where a party scored the lowest. Booths where the party has
  no share at all are not weak booths: they have no data.
* `independent_hotspots` the booths where the independent candidate (`IND`) scored above
  5%, strongest first.
* `derive_winner` and `booth_winners` the winner, runner-up and margin of every booth.
* `candidate_heatmap`, `map_markers`, `party_heatmap`, `locality_summaries` the booth
  tables behind the maps and heatmaps.

## Input formats

The `boothstats` program reads the following formats (`--input-type`):
* `stations` structured booth records (JSON)
* `form20` flat Form 20 extracts (JSON)
* `xlsx` raw vote counts in an Excel workbook

### `stations`

A JSON list of booths:

```text
[{"id": "24_1", "ac_id": "24", "ps_no": "1", "ps_name": "Government School",
  "locality": "POOVAM", "latitude": 10.92, "longitude": 79.81, "category": "A",
  "election2021": {"year": 2021, "total_votes": 812,
                   "candidates": {"AINRC": 0.43, "INC": 0.31, "OTHERS": 0.26}}}]
```

All the `electionYYYY` keys are read. Shares may be numbers or strings.

### `form20`

A JSON object with one `AC_<id>_FINAL` key per assembly, holding one row per booth:

```text
{"AC_24_FINAL": [{"PS_NO_2021": 1, "LOCALITY_EXTRACTED": "POOVAM",
                  "POLLED_2021": 812, "AINRC_2021_pct": 0.43, "INC_2021_pct": 0.31,
                  "Latitude": 10.92, "Longitude": 79.81, "TOP_SCORE_CATEGORY": "A"}]}
```

The booth identifier is `<assembly>_<PS_NO_2021>`, or the position of the row (from 1)
when the station number is missing. Booths that repeat an identifier are kept, under the
identifier suffixed by `#2`, `#3`, and so on.

### `xlsx`

An Excel workbook with one worksheet per election, named by the year (`2019`). The first
row is the header:

|  AC | PS_NO | LOCALITY | PS_NAME | POLLED | TDP | YSRCP | ... |
|-----|-------|----------|---------|--------|-----|-------|-----|
|  24 | 1     | POOVAM   | School  | 812    | 402 | 310   |     |

`AC` and `PS_NO` are mandatory. Every other column is a party, with raw vote counts.
The shares are the counts divided by `POLLED` (or by the sum of the counts when there is
no `POLLED` column), rounded to 6 decimals. Parties without votes are left out, and the
common spellings of the party names are merged (`CONGRESS` is `INC`, `JSP` is `JANASENA`).

## Configuration

The `--config` file is a JSON document. All the fields are optional:

```text
{
  "outputSettings": {"assemblyName": "Poovam", "outputPath": "report.json"},
  "dataSources": [{"provider": "form20", "filePath": "form20.json"}],
  "assemblyId": "24",
  "years": [2011, 2016, 2021],
  "selectedYear": 2021,
  "partyConfig": {"selectedParties": ["NRC", "DMK"]},
  "trendParties": ["NRC", "DMK", "AIADMK", "BJP", "PMK", "IND", "OTHERS"],
  "weakBoothParties": ["BJP", "DMK", "AIADMK"],
  "heatmapParties": ["NRC", "DMK", "BJP"],
  "rules": {"turnoutFactor": 1.25, "topParties": 5, "swingParties": 5,
            "weakBoothLimit": 5, "hotspotLimit": 6, "hotspotThreshold": 0.05},
  "sections": {"mapMarkers": false, "useManualWeakBooths": true},
  "manualWeakBooths": [{"party": "BJP", "locality": "POOVAM", "score": 2.5, "order": 1}],
  "manualHotspots": [],
  "customCards": [{"heading": "Key issues", "content": "...", "order": 1}],
  "partyAliases": {"NRC": "NR Congress"}
}
```

A manual hotspot carries its performance for 2011, 2016 and 2021 (`perf2011`,
`perf2016`, `perf2021`). Only the years listed in `years` are reported.

The command line options `--input`, `--input-type`, `--assembly`, `--year` and `--out`
take precedence over the configuration.

*/
